mod reconnect;
mod replay;
mod vertex;

use glam::{UVec2, Vec3};

pub use self::vertex::*;
use crate::{
    balance_heuristic, BrdfSample, Domain, GBufferEntry, Hit, LightSample,
    Lobe, LobePair, PathInfo, PathTermination, Reconnection,
    ReconnectionVertex, Reservoir, RestirParams, Scene, Vec3Ext, WhiteNoise,
};

/// Reservoir of a single trace, plus the sum of every candidate the trace
/// produced (i.e. the plain path-traced estimate).
#[derive(Clone, Copy, Debug)]
pub struct TraceOutput {
    pub reservoir: Reservoir,
    pub radiance: Vec3,
}

/// Traces paths from the camera and replays them from other pixels.
#[derive(Clone, Copy)]
pub struct PathTracer<'a, S> {
    scene: &'a S,
    params: &'a RestirParams,
}

impl<'a, S> PathTracer<'a, S>
where
    S: Scene,
{
    pub fn new(scene: &'a S, params: &'a RestirParams) -> Self {
        Self { scene, params }
    }

    /// Traces a path through given pixel, turning every light contribution
    /// found along the way into a candidate streamed into the output
    /// reservoir.
    ///
    /// `domain_seed` drives the path itself and `wnoise` drives only the
    /// reservoir's decisions, so the same path can be later replayed from
    /// `domain_seed` alone.
    pub fn trace(
        &self,
        wnoise: &mut WhiteNoise,
        pixel: UVec2,
        domain_seed: u32,
    ) -> TraceOutput {
        let mut rng = WhiteNoise::from_state(domain_seed);
        let jitter = rng.sample2();
        let seed = rng.state();

        let ray = self.scene.camera_ray(pixel, jitter);
        let hit = self.scene.trace(ray);

        let template = PathInfo {
            first_vertex_seed: domain_seed,
            seed,
            ..Default::default()
        };

        let domain = Domain::new(pixel, domain_seed);

        if hit.is_none() {
            let mut out = Candidates::new(wnoise, domain, Default::default());

            out.offer(Some(PathInfo {
                f: self.scene.environment(ray.direction()),
                bounce_count: 1,
                termination: PathTermination::EscapedToEnvmap,
                ..template
            }));

            return out.finish();
        }

        let vertex = self.scene.vertex(hit.triangle_id, hit.barycentrics);

        let mut curr = PathVertex::new(
            vertex,
            ray,
            Vec3::ONE,
            0.0,
            false,
            self.params.min_roughness,
        );

        let mut out = Candidates::new(
            wnoise,
            domain,
            GBufferEntry::new(curr.normal, hit.distance),
        );

        out.offer(Some(PathInfo {
            f: curr.emission(),
            bounce_count: 1,
            termination: PathTermination::BrdfSampled,
            ..template
        }));

        let mut anchor: Option<Anchor> = None;

        for bounce in 0..self.params.max_bounces {
            // Draws happen in a fixed order, no matter which of them get
            // actually used
            let u_light = rng.sample3();
            let u_brdf = rng.sample2();

            if let Some(light) = self.next_event(&curr, u_light) {
                out.offer(self.light_sampled(
                    &curr,
                    bounce,
                    &light,
                    anchor.as_ref(),
                    template,
                ));
            }

            let Some(sample) = curr.brdf().sample(curr.wo, u_brdf) else {
                break;
            };

            if let Some(anchor) = &mut anchor {
                if anchor.bounce == bounce {
                    anchor.direction = sample.direction;
                    anchor.postfix = Vec3::ONE;
                } else {
                    anchor.postfix *= sample.weight;
                }
            }

            let ray = curr.vertex.ray_towards(sample.direction);
            let hit = self.scene.trace(ray);

            if hit.is_none() {
                out.offer(self.escaped(
                    &curr,
                    bounce,
                    &sample,
                    hit,
                    anchor.as_ref(),
                    template,
                ));

                break;
            }

            let next = PathVertex::new(
                self.scene.vertex(hit.triangle_id, hit.barycentrics),
                ray,
                curr.throughput * sample.weight,
                sample.pdf,
                sample.is_delta,
                self.params.min_roughness,
            );

            if anchor.is_none() && self.is_interior_anchor(&curr, &next) {
                anchor = Some(Anchor {
                    bounce: bounce + 1,
                    prev: curr,
                    lobes: LobePair {
                        prev: curr.lobe(),
                        anchor: next.lobe(),
                    },
                    vertex: ReconnectionVertex::Surface {
                        triangle_id: next.vertex.triangle_id,
                        barycentrics: next.vertex.barycentrics,
                    },
                    direction: Vec3::ZERO,
                    postfix: Vec3::ONE,
                });
            }

            out.offer(self.brdf_sampled(
                &curr,
                &next,
                bounce + 1,
                hit,
                anchor.as_ref(),
                template,
            ));

            curr = next;
        }

        out.finish()
    }

    /// Returns whether `curr` would be picked as the reconnection vertex of a
    /// path continuing after it.
    fn is_interior_anchor(&self, prev: &PathVertex, curr: &PathVertex) -> bool {
        prev.is_rough
            && curr.is_rough
            && prev.point().distance(curr.point())
                > self.params.min_reconnection_distance
    }

    /// Returns whether an emitter `distance` away from `prev` would be picked
    /// as the reconnection vertex of a path ending there.
    fn is_endpoint_anchor(&self, prev: &PathVertex, distance: f32) -> bool {
        prev.is_rough && distance > self.params.min_reconnection_distance
    }

    /// Performs next-event estimation from `curr`.
    fn next_event(&self, curr: &PathVertex, u: Vec3) -> Option<NextEvent> {
        if curr.is_delta() {
            return None;
        }

        match self.scene.sample_light(curr.point(), u) {
            LightSample::Surface { vertex: light, pdf } => {
                let offset = light.point - curr.point();
                let distance = offset.length();

                if distance <= 0.0 {
                    return None;
                }

                let direction = offset / distance;
                let emission = light.emission_towards(-direction);

                if !emission.is_lit() {
                    return None;
                }

                let cos = light.normal.dot(direction).abs();
                let light_pdf = pdf * distance * distance / cos;

                if !(light_pdf.is_finite() && light_pdf > 0.0) {
                    return None;
                }

                let eval = curr.brdf().eval(curr.wo, direction);

                if eval.pdf <= 0.0 {
                    return None;
                }

                let hit = self.scene.trace(curr.vertex.ray_towards(direction));

                if hit.is_none() || hit.triangle_id != light.triangle_id {
                    return None;
                }

                let mis = balance_heuristic(light_pdf, eval.pdf);

                Some(NextEvent {
                    termination: PathTermination::LightSampled,
                    vertex: ReconnectionVertex::Surface {
                        triangle_id: light.triangle_id,
                        barycentrics: light.barycentrics,
                    },
                    direction,
                    distance,
                    emission,
                    light_pdf,
                    value: eval.value * (mis / light_pdf) * emission,
                    hit,
                })
            }

            LightSample::Environment { direction, pdf } => {
                let emission = self.scene.environment(direction);

                if !emission.is_lit() || pdf <= 0.0 {
                    return None;
                }

                let eval = curr.brdf().eval(curr.wo, direction);

                if eval.pdf <= 0.0 {
                    return None;
                }

                let hit = self.scene.trace(curr.vertex.ray_towards(direction));

                if hit.is_some() {
                    return None;
                }

                let mis = balance_heuristic(pdf, eval.pdf);

                Some(NextEvent {
                    termination: PathTermination::EnvmapSampled,
                    vertex: ReconnectionVertex::Environment { direction },
                    direction,
                    distance: f32::INFINITY,
                    emission,
                    light_pdf: pdf,
                    value: eval.value * (mis / pdf) * emission,
                    hit,
                })
            }

            LightSample::None => None,
        }
    }

    /// Returns radiance emitted by `curr` towards `prev`, together with the
    /// solid-angle pdf of light sampling picking `curr` and the weight of the
    /// BRDF technique.
    fn emission(&self, prev: &PathVertex, curr: &PathVertex) -> (Vec3, f32, f32) {
        let emission = curr.emission();

        if !emission.is_lit() {
            return (Vec3::ZERO, 0.0, 0.0);
        }

        let light_pdf = self.scene.light_pdf(prev.point(), &curr.vertex);

        let mis = if curr.after_delta {
            1.0
        } else {
            balance_heuristic(curr.incoming_pdf, light_pdf)
        };

        (emission, light_pdf, mis)
    }

    /// Returns radiance of the environment in the direction of `sample`,
    /// together with the pdf of light sampling picking that direction and
    /// the weight of the BRDF technique.
    fn escape(&self, sample: &BrdfSample) -> (Vec3, f32, f32) {
        let emission = self.scene.environment(sample.direction);
        let env_pdf = self.scene.environment_pdf();

        let mis = if sample.is_delta {
            1.0
        } else {
            balance_heuristic(sample.pdf, env_pdf)
        };

        (emission, env_pdf, mis)
    }

    /// Builds a candidate from next-event estimation at `curr`, i.e. `x_bounce`.
    fn light_sampled(
        &self,
        curr: &PathVertex,
        bounce: u32,
        light: &NextEvent,
        anchor: Option<&Anchor>,
        template: PathInfo,
    ) -> Option<PathInfo> {
        let path = PathInfo {
            bounce_count: bounce + 2,
            termination: light.termination,
            ..template
        };

        match anchor {
            Some(anchor) => {
                let reconnection = if anchor.bounce == bounce {
                    anchor.reconnection(
                        light.direction,
                        light.emission,
                        light.light_pdf,
                    )
                } else {
                    anchor.reconnection(
                        anchor.direction,
                        anchor.postfix * light.value,
                        0.0,
                    )
                };

                self.reconnected(path, reconnection, &anchor.prev, None)
            }

            None if self.is_endpoint_anchor(curr, light.distance) => {
                let reconnection = Reconnection {
                    bounce: bounce + 1,
                    lobes: LobePair {
                        prev: curr.lobe(),
                        anchor: Lobe::Emitter,
                    },
                    vertex: light.vertex,
                    radiance: light.emission,
                    radiance_direction: -light.direction,
                    light_pdf: 0.0,
                };

                self.reconnected(path, reconnection, curr, Some(light.hit))
            }

            None => Some(PathInfo {
                f: curr.throughput * light.value,
                ..path
            }),
        }
    }

    /// Builds a candidate from a BRDF-sampled ray that went from `prev` and
    /// hit `curr`, i.e. `x_bounce`.
    fn brdf_sampled(
        &self,
        prev: &PathVertex,
        curr: &PathVertex,
        bounce: u32,
        hit: Hit,
        anchor: Option<&Anchor>,
        template: PathInfo,
    ) -> Option<PathInfo> {
        let (emission, light_pdf, mis) = self.emission(prev, curr);

        if !emission.is_lit() {
            return None;
        }

        let path = PathInfo {
            bounce_count: bounce + 1,
            termination: PathTermination::BrdfSampled,
            ..template
        };

        match anchor {
            Some(anchor) if anchor.bounce < bounce => {
                let reconnection = if anchor.bounce + 1 == bounce {
                    anchor.reconnection(anchor.direction, emission, light_pdf)
                } else {
                    anchor.reconnection(
                        anchor.direction,
                        anchor.postfix * mis * emission,
                        0.0,
                    )
                };

                self.reconnected(path, reconnection, &anchor.prev, None)
            }

            _ if self.is_endpoint_anchor(
                prev,
                prev.point().distance(curr.point()),
            ) =>
            {
                // Known issue: the reconnection lobe is the emitter's surface
                // lobe (instead of `Lobe::Emitter`) and the radiance direction
                // points back towards `prev`; neither is read when the
                // reconnection vertex ends the path.
                let reconnection = Reconnection {
                    bounce,
                    lobes: LobePair {
                        prev: prev.lobe(),
                        anchor: curr.lobe(),
                    },
                    vertex: ReconnectionVertex::Surface {
                        triangle_id: curr.vertex.triangle_id,
                        barycentrics: curr.vertex.barycentrics,
                    },
                    radiance: emission,
                    radiance_direction: curr.wo,
                    light_pdf: 0.0,
                };

                self.reconnected(path, reconnection, prev, Some(hit))
            }

            _ => Some(PathInfo {
                f: curr.throughput * mis * emission,
                ..path
            }),
        }
    }

    /// Builds a candidate from a BRDF-sampled ray that left `curr`, i.e.
    /// `x_bounce`, and didn't hit anything.
    fn escaped(
        &self,
        curr: &PathVertex,
        bounce: u32,
        sample: &BrdfSample,
        hit: Hit,
        anchor: Option<&Anchor>,
        template: PathInfo,
    ) -> Option<PathInfo> {
        let (emission, env_pdf, mis) = self.escape(sample);

        if !emission.is_lit() {
            return None;
        }

        let path = PathInfo {
            bounce_count: bounce + 2,
            termination: PathTermination::EscapedToEnvmap,
            ..template
        };

        match anchor {
            Some(anchor) => {
                let reconnection = if anchor.bounce == bounce {
                    anchor.reconnection(anchor.direction, emission, env_pdf)
                } else {
                    anchor.reconnection(
                        anchor.direction,
                        anchor.postfix * mis * emission,
                        0.0,
                    )
                };

                self.reconnected(path, reconnection, &anchor.prev, None)
            }

            None if self.is_endpoint_anchor(curr, f32::INFINITY) => {
                let reconnection = Reconnection {
                    bounce: bounce + 1,
                    lobes: LobePair {
                        prev: curr.lobe(),
                        anchor: Lobe::Emitter,
                    },
                    vertex: ReconnectionVertex::Environment {
                        direction: sample.direction,
                    },
                    radiance: emission,
                    radiance_direction: sample.direction,
                    light_pdf: 0.0,
                };

                self.reconnected(path, reconnection, curr, Some(hit))
            }

            None => Some(PathInfo {
                f: curr.throughput * sample.weight * mis * emission,
                ..path
            }),
        }
    }

    fn reconnected(
        &self,
        path: PathInfo,
        reconnection: Reconnection,
        from: &PathVertex,
        hit: Option<Hit>,
    ) -> Option<PathInfo> {
        let (f, jacobian) = self.reconnect(
            from,
            &reconnection,
            path.termination,
            path.bounce_count,
            hit,
        )?;

        Some(PathInfo {
            f,
            reconnection: Some(reconnection),
            jacobian,
            ..path
        })
    }
}

/// Outcome of next-event estimation.
#[derive(Clone, Copy, Debug)]
struct NextEvent {
    termination: PathTermination,
    vertex: ReconnectionVertex,
    direction: Vec3,

    /// Distance to the light; infinity for the environment
    distance: f32,

    emission: Vec3,

    /// Solid-angle pdf of picking this light sample
    light_pdf: f32,

    /// BRDF times cosine times emission, weighted and divided by
    /// `light_pdf`
    value: Vec3,

    hit: Hit,
}

/// Reconnection vertex found by the forward trace.
#[derive(Clone, Copy, Debug)]
struct Anchor {
    bounce: u32,

    /// Vertex preceding the reconnection vertex
    prev: PathVertex,

    lobes: LobePair,
    vertex: ReconnectionVertex,

    /// Direction sampled at the reconnection vertex
    direction: Vec3,

    /// Throughput accumulated after the reconnection vertex
    postfix: Vec3,
}

impl Anchor {
    fn reconnection(
        &self,
        radiance_direction: Vec3,
        radiance: Vec3,
        light_pdf: f32,
    ) -> Reconnection {
        Reconnection {
            bounce: self.bounce,
            lobes: self.lobes,
            vertex: self.vertex,
            radiance,
            radiance_direction,
            light_pdf,
        }
    }
}

struct Candidates<'a> {
    wnoise: &'a mut WhiteNoise,
    reservoir: Reservoir,
    radiance: Vec3,
}

impl<'a> Candidates<'a> {
    fn new(
        wnoise: &'a mut WhiteNoise,
        domain: Domain,
        gbuffer: GBufferEntry,
    ) -> Self {
        Self {
            wnoise,
            reservoir: Reservoir::new(domain, gbuffer),
            radiance: Vec3::ZERO,
        }
    }

    fn offer(&mut self, path: Option<PathInfo>) {
        let Some(path) = path else {
            return;
        };

        if !path.f.is_finite() || !path.f.is_lit() {
            return;
        }

        self.radiance += path.f;
        self.reservoir.update(self.wnoise, path, path.p_hat());
    }

    fn finish(mut self) -> TraceOutput {
        self.reservoir.c = 1.0;
        self.reservoir.finalize();

        TraceOutput {
            reservoir: self.reservoir,
            radiance: self.radiance,
        }
    }
}
