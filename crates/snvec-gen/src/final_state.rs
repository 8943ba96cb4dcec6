//! Expansion of raw interaction records into full particle lists.

use snvec_core::constants::{
    ELECTRON_MASS, EMITTED_NUCLEON_KINETIC, NEUTRON_MASS, PDG_ELECTRON, PDG_GAMMA, PDG_POSITRON,
    PROTON_MASS,
};
use snvec_core::event::scale;
use snvec_core::{
    CcExcitation, ChannelFamily, CrossSectionModel, DecayChannel, ErrorInfo, FinalStateEvent,
    FinalStateParticle, Flavor, Nucleon, RandomSource, RawEventRecord, ReactionChannel, SnError,
    Vec3, VertexRecord,
};

use crate::frame::{isotropic_direction, FrameRotation};
use crate::kinematics::{KinematicsSampler, LeptonKinematics};

/// De-excitation gammas of ¹⁵N after proton knock-out, by level.
pub const NITROGEN_15_GAMMAS: [f64; 8] = [5.270, 5.299, 6.324, 7.155, 7.301, 7.567, 8.313, 8.571];
/// De-excitation gammas of ¹⁵O after neutron knock-out, by level.
pub const OXYGEN_15_GAMMAS: [f64; 4] = [5.183, 5.241, 6.176, 6.793];
/// Gamma emitted by ν̄e charged-current reactions in the gamma decay channel.
pub const NUEBAR_CC_GAMMA: f64 = 12.674;

/// Bookkeeping role of a particle within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleRole {
    /// Incoming neutrino.
    Incident,
    /// Target at rest.
    Target,
    /// Reaction product.
    Primary,
    /// Emission from the excited residual nucleus.
    Associated,
}

impl ParticleRole {
    /// `(origin, initial vertex, final-state flag, detection flag, final vertex)`.
    pub fn flags(self) -> (i32, i32, i32, i32, i32) {
        match self {
            ParticleRole::Incident | ParticleRole::Target => (0, 1, -1, 0, 1),
            ParticleRole::Primary => (1, 1, 0, 1, 1),
            ParticleRole::Associated => (0, 1, 0, 1, 1),
        }
    }

    /// Builds a particle carrying this role's flags.
    pub fn particle(self, pdg: i32, energy: f64, momentum: Vec3) -> FinalStateParticle {
        let (origin, initial_vertex, final_state_flag, detection_flag, final_vertex) = self.flags();
        FinalStateParticle {
            pdg,
            energy,
            momentum,
            origin,
            initial_vertex,
            final_vertex,
            final_state_flag,
            detection_flag,
        }
    }
}

/// Channel-family specific particle list builder.
pub type Template = fn(
    &FinalStateBuilder,
    &RawEventRecord,
    &dyn CrossSectionModel,
    &mut dyn RandomSource,
) -> Result<Vec<FinalStateParticle>, SnError>;

/// Turns raw records into [`FinalStateEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct FinalStateBuilder {
    kinematics: KinematicsSampler,
}

impl FinalStateBuilder {
    /// Builder drawing lepton kinematics with `kinematics`.
    pub fn new(kinematics: KinematicsSampler) -> Self {
        Self { kinematics }
    }

    /// Template responsible for a channel family.
    pub fn template_for(family: ChannelFamily) -> Template {
        match family {
            ChannelFamily::InverseBetaDecay => inverse_beta_decay,
            ChannelFamily::Elastic => elastic_scattering,
            ChannelFamily::ChargedCurrentOxygen => charged_current_oxygen,
            ChannelFamily::NeutralCurrentOxygen => neutral_current_oxygen,
        }
    }

    /// Expands one record.
    ///
    /// Kinematics failures are returned unchanged so the caller can count the
    /// record as skipped.
    pub fn build(
        &self,
        record: &RawEventRecord,
        model: &dyn CrossSectionModel,
        rng: &mut dyn RandomSource,
    ) -> Result<FinalStateEvent, SnError> {
        let template = Self::template_for(record.channel.family());
        let particles = template(self, record, model, rng)?;
        Ok(FinalStateEvent {
            channel_id: record.channel.encode()?,
            emission_time: record.time,
            neutrino_energy: record.energy,
            particles,
            vertex: VertexRecord {
                position: record.vertex,
                time: 0.0,
                kind: 1,
                parent: 0,
            },
            subrun: None,
        })
    }

    /// Outgoing charged lepton with sampled energy and angle.
    fn lepton(
        &self,
        record: &RawEventRecord,
        model: &dyn CrossSectionModel,
        rng: &mut dyn RandomSource,
        pdg: i32,
    ) -> Result<FinalStateParticle, SnError> {
        let kin = self.kinematics.sample(model, &record.channel, record.energy, rng)?;
        let momentum = on_shell_momentum(kin.energy, ELECTRON_MASS);
        let direction = FrameRotation::from_direction(record.direction).apply(kin.theta, kin.phi);
        Ok(ParticleRole::Primary.particle(pdg, kin.energy, scale(direction, momentum)))
    }
}

fn incident(record: &RawEventRecord) -> FinalStateParticle {
    ParticleRole::Incident.particle(
        record.channel.flavor().pdg_code(),
        record.energy,
        scale(record.direction, record.energy),
    )
}

fn on_shell_momentum(energy: f64, mass: f64) -> f64 {
    (energy * energy - mass * mass).max(0.0).sqrt()
}

fn isotropic_nucleon(
    role: ParticleRole,
    nucleon: Nucleon,
    rng: &mut dyn RandomSource,
) -> FinalStateParticle {
    let mass = nucleon.mass();
    let energy = mass + EMITTED_NUCLEON_KINETIC;
    let direction = isotropic_direction(rng);
    role.particle(
        nucleon.pdg_code(),
        energy,
        scale(direction, on_shell_momentum(energy, mass)),
    )
}

fn isotropic_gamma(role: ParticleRole, energy: f64, rng: &mut dyn RandomSource) -> FinalStateParticle {
    let direction = isotropic_direction(rng);
    role.particle(PDG_GAMMA, energy, scale(direction, energy))
}

fn inverse_beta_decay(
    builder: &FinalStateBuilder,
    record: &RawEventRecord,
    model: &dyn CrossSectionModel,
    rng: &mut dyn RandomSource,
) -> Result<Vec<FinalStateParticle>, SnError> {
    let kin = builder
        .kinematics
        .sample(model, &record.channel, record.energy, rng)?;
    Ok(assemble_inverse_beta_decay(record.energy, record.direction, &kin))
}

/// Four-body IBD final state for given positron kinematics.
///
/// The neutron takes the momentum the positron leaves behind, the proton
/// being at rest.
pub fn assemble_inverse_beta_decay(
    energy: f64,
    direction: Vec3,
    positron: &LeptonKinematics,
) -> Vec<FinalStateParticle> {
    let neutrino = ParticleRole::Incident.particle(
        Flavor::ElectronAntineutrino.pdg_code(),
        energy,
        scale(direction, energy),
    );
    let proton =
        ParticleRole::Target.particle(Nucleon::Proton.pdg_code(), PROTON_MASS, [0.0; 3]);
    let lepton_direction =
        FrameRotation::from_direction(direction).apply(positron.theta, positron.phi);
    let positron = ParticleRole::Primary.particle(
        PDG_POSITRON,
        positron.energy,
        scale(
            lepton_direction,
            on_shell_momentum(positron.energy, ELECTRON_MASS),
        ),
    );
    let momentum = [
        neutrino.momentum[0] - positron.momentum[0],
        neutrino.momentum[1] - positron.momentum[1],
        neutrino.momentum[2] - positron.momentum[2],
    ];
    let p2 = momentum.iter().map(|c| c * c).sum::<f64>();
    let neutron = ParticleRole::Primary.particle(
        Nucleon::Neutron.pdg_code(),
        (p2 + NEUTRON_MASS * NEUTRON_MASS).sqrt(),
        momentum,
    );
    vec![neutrino, proton, positron, neutron]
}

fn elastic_scattering(
    builder: &FinalStateBuilder,
    record: &RawEventRecord,
    model: &dyn CrossSectionModel,
    rng: &mut dyn RandomSource,
) -> Result<Vec<FinalStateParticle>, SnError> {
    let neutrino = incident(record);
    let electron = builder.lepton(record, model, rng, PDG_ELECTRON)?;
    Ok(vec![neutrino, electron])
}

fn charged_current_oxygen(
    builder: &FinalStateBuilder,
    record: &RawEventRecord,
    model: &dyn CrossSectionModel,
    rng: &mut dyn RandomSource,
) -> Result<Vec<FinalStateParticle>, SnError> {
    let ReactionChannel::ChargedCurrentOxygen {
        flavor, excitation, ..
    } = record.channel
    else {
        return Err(family_mismatch(&record.channel));
    };
    let lepton_pdg = match flavor {
        Flavor::ElectronNeutrino => PDG_ELECTRON,
        Flavor::ElectronAntineutrino => PDG_POSITRON,
        _ => return Err(family_mismatch(&record.channel)),
    };
    let mut particles = vec![
        incident(record),
        builder.lepton(record, model, rng, lepton_pdg)?,
    ];
    if let CcExcitation::Level { decay_channel, .. } = excitation {
        if flavor == Flavor::ElectronAntineutrino && decay_channel == DecayChannel::Gamma {
            particles.push(isotropic_gamma(ParticleRole::Associated, NUEBAR_CC_GAMMA, rng));
        }
        for _ in 0..decay_channel.neutrons() {
            particles.push(isotropic_nucleon(
                ParticleRole::Associated,
                Nucleon::Neutron,
                rng,
            ));
        }
    }
    Ok(particles)
}

fn neutral_current_oxygen(
    _builder: &FinalStateBuilder,
    record: &RawEventRecord,
    _model: &dyn CrossSectionModel,
    rng: &mut dyn RandomSource,
) -> Result<Vec<FinalStateParticle>, SnError> {
    let ReactionChannel::NeutralCurrentOxygen { nucleon, level, .. } = record.channel else {
        return Err(family_mismatch(&record.channel));
    };
    let table: &[f64] = match nucleon {
        Nucleon::Proton => &NITROGEN_15_GAMMAS,
        Nucleon::Neutron => &OXYGEN_15_GAMMAS,
    };
    let gamma_energy = table.get(usize::from(level)).copied().ok_or_else(|| {
        SnError::Codec(
            ErrorInfo::new("field-out-of-range", "no de-excitation gamma for level")
                .with_context("channel", record.channel.label())
                .with_context("level", level.to_string()),
        )
    })?;
    let neutrino = incident(record);
    let emitted = isotropic_nucleon(ParticleRole::Primary, nucleon, rng);
    let gamma = isotropic_gamma(ParticleRole::Primary, gamma_energy, rng);
    Ok(vec![neutrino, emitted, gamma])
}

fn family_mismatch(channel: &ReactionChannel) -> SnError {
    SnError::Codec(
        ErrorInfo::new("unrecognized-channel", "channel has no final-state template")
            .with_context("channel", channel.label()),
    )
}
