use hashbrown::HashSet;

use crate::types::{NodeId, Triangle, TriangleId};

/// Defines which phases of the Triangulation are recorded
#[derive(Debug, Clone)]
pub enum PhaseRecord {
    /// Records all the phases
    All,
    /// Records the steps during the specified phase
    In(Phase),
    /// Records the steps during the specified phases
    InAny(HashSet<Phase>),
}

/// Defines which steps of the Triangulation are recorded.
///
/// Step 0 is the brute force triangulation, step `n` is the insertion of the `n`-th polygon vertex.
#[derive(Debug, Clone)]
pub enum StepsRecord {
    /// Records all the steps
    All,
    /// Records all the steps after the specified one (inclusive)
    From(usize),
    /// Records all the steps until the specified one (inclusive)
    Until(usize),
    /// Records all the steps between the specified ones (inclusive)
    Between(usize, usize),
}

#[derive(Debug, Clone)]
pub struct DebugConfiguration {
    pub phase_record: PhaseRecord,
    pub steps_record: StepsRecord,
    /// [None] means that it won't force an early exit of the vertices insertion replay
    pub force_end_at_step: Option<usize>,
}
impl Default for DebugConfiguration {
    fn default() -> Self {
        Self {
            phase_record: PhaseRecord::All,
            steps_record: StepsRecord::All,
            force_end_at_step: Default::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DebugSnapshot {
    pub step: usize,
    pub phase: Phase,
    /// Ids (in `triangles`) of the triangles concerned by this phase
    pub changed_ids: Vec<TriangleId>,
    pub triangles: Vec<Triangle>,
}
impl DebugSnapshot {
    pub(crate) fn new(
        step: usize,
        phase: Phase,
        triangles: Vec<Triangle>,
        changed_ids: Vec<TriangleId>,
    ) -> Self {
        Self {
            step,
            phase,
            triangles,
            changed_ids,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DebugContext {
    pub config: DebugConfiguration,
    pub snapshots: Vec<DebugSnapshot>,
    pub current_step: usize,
}

impl DebugContext {
    pub(crate) fn new(config: DebugConfiguration) -> Self {
        Self {
            config,
            snapshots: Vec::new(),
            current_step: 0,
        }
    }

    pub(crate) fn push_snapshot(
        &mut self,
        phase: Phase,
        triangles: &[Triangle],
        changed_ids: &[TriangleId],
    ) {
        let record = match &self.config.phase_record {
            PhaseRecord::All => true,
            PhaseRecord::InAny(phases) => phases.contains(&phase),
            PhaseRecord::In(rec_phase) => phase == *rec_phase,
        };
        if !record {
            return;
        }
        if match self.config.steps_record {
            StepsRecord::All => true,
            StepsRecord::From(from) => self.current_step >= from,
            StepsRecord::Until(to) => self.current_step <= to,
            StepsRecord::Between(from, to) => self.current_step >= from && self.current_step <= to,
        } {
            self.snapshots.push(DebugSnapshot::new(
                self.current_step,
                phase,
                triangles.to_vec(),
                changed_ids.to_vec(),
            ));
        }
    }

    /// Returns true if the algorithm should stop
    pub(crate) fn advance_step(&mut self) -> bool {
        self.current_step += 1;
        match self.config.force_end_at_step {
            Some(end_step) => self.current_step > end_step,
            None => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Triangles kept by the brute force triangulation
    BruteForce,
    /// Triangles containing the inserted node, before their removal
    LocateTriangles(NodeId),
    /// Triangles created around the inserted node
    FanTriangles(NodeId),
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::{
        debug::{DebugConfiguration, Phase, PhaseRecord, StepsRecord},
        triangulation::{Triangulation, TriangulationConfiguration},
        types::{Polygon, Vertex},
    };

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
            Vertex::new(0., 1.),
        ])
    }

    fn triangulate(debug_config: DebugConfiguration) -> Triangulation {
        Triangulation::from_polygon(
            &unit_square(),
            TriangulationConfiguration {
                debug_config,
                ..Default::default()
            },
        )
        .expect("Triangulation should succeed")
    }

    #[test]
    fn records_all_phases() {
        let triangulation = triangulate(DebugConfiguration::default());
        let snapshots = &triangulation.debug_context.snapshots;

        // Brute force + (locate, fan) for each of the 4 polygon vertices
        assert_eq!(9, snapshots.len());
        assert_eq!(Phase::BruteForce, snapshots[0].phase);
        assert_eq!(0, snapshots[0].step);
        assert_eq!(4, snapshots[0].changed_ids.len());

        assert_eq!(Phase::LocateTriangles(0), snapshots[1].phase);
        assert_eq!(1, snapshots[1].step);
        assert_eq!(2, snapshots[1].changed_ids.len());
        assert_eq!(Phase::FanTriangles(0), snapshots[2].phase);
        assert_eq!(2, snapshots[2].changed_ids.len());
    }

    #[test]
    fn records_filtered_phase_and_steps() {
        let triangulation = triangulate(DebugConfiguration {
            phase_record: PhaseRecord::In(Phase::FanTriangles(2)),
            steps_record: StepsRecord::From(2),
            force_end_at_step: None,
        });
        let snapshots = &triangulation.debug_context.snapshots;

        assert_eq!(1, snapshots.len());
        assert_eq!(3, snapshots[0].step);
    }

    #[test]
    fn force_end_stops_the_replay() {
        let triangulation = triangulate(DebugConfiguration {
            force_end_at_step: Some(2),
            ..Default::default()
        });

        assert_eq!(2, triangulation.nodes().len());
    }
}
