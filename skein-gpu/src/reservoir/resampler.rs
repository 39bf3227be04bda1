use crate::{
    balance_heuristic, Mis, PathInfo, Reservoir, RestirParams, Shift,
    ShiftMapping, WhiteNoise, MAX_CANDIDATES,
};

/// Outcome of [`Resampler::resample()`].
#[derive(Clone, Copy, Debug)]
pub struct Resampled {
    pub reservoir: Reservoir,

    /// Resampling MIS weight of each candidate; zero for candidates that
    /// couldn't be shifted into the canonical domain
    pub weights: [f32; MAX_CANDIDATES],

    /// Index of the candidate whose path got selected
    pub selected: Option<usize>,
}

/// Combines reservoirs from different domains into a single reservoir living
/// in the domain of the first (canonical) one.
#[derive(Clone, Copy)]
pub struct Resampler<'a, S> {
    shift: &'a S,
    mis: Mis,
    max_confidence: f32,
}

impl<'a, S> Resampler<'a, S>
where
    S: ShiftMapping,
{
    pub fn new(shift: &'a S, params: &RestirParams) -> Self {
        Self {
            shift,
            mis: params.mis(),
            max_confidence: params.max_confidence,
        }
    }

    pub fn with_mis(mut self, mis: Mis) -> Self {
        self.mis = mis;
        self
    }

    pub fn resample(
        &self,
        wnoise: &mut WhiteNoise,
        candidates: &[Reservoir],
    ) -> Resampled {
        let mut weights = [0.0; MAX_CANDIDATES];
        let mut selected = None;

        let Some(canonical) = candidates.first() else {
            return Resampled {
                reservoir: Default::default(),
                weights,
                selected,
            };
        };

        let candidates = &candidates[..candidates.len().min(MAX_CANDIDATES)];
        let mut out = Reservoir::new(canonical.domain, canonical.gbuffer);

        for (idx, candidate) in candidates.iter().enumerate() {
            let shifted = if candidate.is_null {
                None
            } else if idx == 0 {
                Some(Shift::identity(candidate.sample))
            } else if candidate.domain.is_on_screen() {
                self.shift.shift(
                    &candidate.sample,
                    &candidate.domain,
                    &canonical.domain,
                )
            } else {
                None
            };

            let Some(shifted) = shifted else {
                out.update_with_confidence(
                    wnoise,
                    PathInfo::default(),
                    0.0,
                    candidate.c,
                );

                continue;
            };

            let mis = self.weight(candidates, idx, &shifted);
            let weight = mis * shifted.p_hat() * candidate.w * shifted.jacobian;

            weights[idx] = mis;

            if out.update_with_confidence(
                wnoise,
                shifted.path,
                weight,
                candidate.c,
            ) {
                selected = Some(idx);
            }
        }

        out.clamp_confidence(self.max_confidence);
        out.finalize();

        Resampled {
            reservoir: out,
            weights,
            selected: selected.filter(|_| !out.is_null),
        }
    }

    /// Computes the resampling MIS weight of `candidates[idx]`, whose path
    /// after shifting into the canonical domain is `shifted`.
    fn weight(
        &self,
        candidates: &[Reservoir],
        idx: usize,
        shifted: &Shift,
    ) -> f32 {
        match self.mis {
            Mis::Gbh => self.gbh_weight(candidates, idx, shifted),
            Mis::Pairwise => self.pairwise_weight(candidates, idx, shifted),

            Mis::Biased => {
                let active = candidates
                    .iter()
                    .filter(|candidate| candidate.domain.is_on_screen())
                    .count();

                if active > 0 {
                    1.0 / active as f32
                } else {
                    0.0
                }
            }
        }
    }

    fn gbh_weight(
        &self,
        candidates: &[Reservoir],
        idx: usize,
        shifted: &Shift,
    ) -> f32 {
        let this = &candidates[idx];
        let own = this.c * this.sample.p_hat();
        let mut sum = own;

        for (other_idx, other) in candidates.iter().enumerate() {
            if other_idx == idx || !other.domain.is_on_screen() {
                continue;
            }

            // Shift into the canonical domain has been already done by the
            // caller
            let shifted = if other_idx == 0 {
                Some(*shifted)
            } else {
                self.shift
                    .shift(&this.sample, &this.domain, &other.domain)
            };

            if let Some(shifted) = shifted {
                sum += other.c * shifted.p_hat() * shifted.jacobian;
            }
        }

        if sum > 0.0 {
            (own / sum).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn pairwise_weight(
        &self,
        candidates: &[Reservoir],
        idx: usize,
        shifted: &Shift,
    ) -> f32 {
        let canonical = &candidates[0];

        let k = candidates
            .iter()
            .skip(1)
            .filter(|candidate| candidate.domain.is_on_screen())
            .count();

        if k == 0 {
            return if idx == 0 { 1.0 } else { 0.0 };
        }

        let k = k as f32;
        let canonical_c = canonical.c / k;

        if idx == 0 {
            let own = canonical_c * canonical.sample.p_hat();

            let sum: f32 = candidates
                .iter()
                .skip(1)
                .filter(|other| other.domain.is_on_screen())
                .map(|other| {
                    let other_p_hat = self
                        .shift
                        .shift(&canonical.sample, &canonical.domain, &other.domain)
                        .map(|shifted| {
                            other.c * shifted.p_hat() * shifted.jacobian
                        })
                        .unwrap_or(0.0);

                    balance_heuristic(own, other_p_hat)
                })
                .sum();

            (sum / k).clamp(0.0, 1.0)
        } else {
            let this = &candidates[idx];
            let own = this.c * this.sample.p_hat();
            let other = canonical_c * shifted.p_hat() * shifted.jacobian;

            (balance_heuristic(own, other) / k).clamp(0.0, 1.0)
        }
    }
}
