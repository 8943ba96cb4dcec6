//! Event records flowing from the rate integrator to the output layer.

use serde::{Deserialize, Serialize};

use crate::channel::ReactionChannel;
use crate::models::SubrunKey;

/// Cartesian three-vector.
pub type Vec3 = [f64; 3];

/// Lightweight record of one sampled interaction, before final-state expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventRecord {
    /// Reaction that occurred.
    pub channel: ReactionChannel,
    /// Emission time in seconds.
    pub time: f64,
    /// Incident neutrino energy in MeV.
    pub energy: f64,
    /// Unit vector along the neutrino travel direction.
    pub direction: Vec3,
    /// Interaction vertex in cm.
    pub vertex: Vec3,
}

/// One outgoing (or incoming) particle of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStateParticle {
    /// PDG particle code.
    pub pdg: i32,
    /// Total energy in MeV.
    pub energy: f64,
    /// Momentum in MeV/c.
    pub momentum: Vec3,
    /// Index of the parent particle.
    pub origin: i32,
    /// Initial vertex number.
    pub initial_vertex: i32,
    /// Final vertex number.
    pub final_vertex: i32,
    /// Final-state flag: `-1` for incoming particles, `0` for outgoing.
    pub final_state_flag: i32,
    /// Detection flag: `1` when the particle should be tracked downstream.
    pub detection_flag: i32,
}

/// Vertex bookkeeping attached to each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Position in cm.
    pub position: Vec3,
    /// Vertex time, always zero; emission time lives on the event.
    pub time: f64,
    /// Vertex kind flag.
    pub kind: i32,
    /// Parent vertex index.
    pub parent: i32,
}

/// Fully expanded event ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStateEvent {
    /// Packed reaction identifier.
    pub channel_id: u32,
    /// Emission time in seconds.
    pub emission_time: f64,
    /// Incident neutrino energy in MeV.
    pub neutrino_energy: f64,
    /// Particles; index 0 is always the incident neutrino.
    pub particles: Vec<FinalStateParticle>,
    /// Interaction vertex.
    pub vertex: VertexRecord,
    /// Detector subrun the event is assigned to, for livetime-planned samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subrun: Option<SubrunKey>,
}

/// Euclidean norm of a vector.
pub fn norm(v: Vec3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Scales a vector by a scalar.
pub fn scale(v: Vec3, factor: f64) -> Vec3 {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}
