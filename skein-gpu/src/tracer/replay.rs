use glam::{Vec2, Vec3};

use super::PathVertex;
use crate::{
    Domain, Jacobian, PathInfo, PathTermination, PathTracer, Scene, Shift,
    ShiftMapping, Vec3Ext, WhiteNoise,
};

impl<S> PathTracer<'_, S>
where
    S: Scene,
{
    /// Regenerates `path` as if it was traced from domain `into`: the camera
    /// ray gets generated from `into`, the bounces repeat the path's random
    /// decisions and, once the reconnection vertex is reached, the new prefix
    /// gets connected to it.
    ///
    /// Returns `None` if the path couldn't have been generated in that domain
    /// (which includes the case of it being picked differently there, e.g.
    /// with a different reconnection vertex).
    pub fn replay(&self, path: &PathInfo, into: &Domain) -> Option<PathInfo> {
        let pixel = into.pixel()?;

        if path.bounce_count == 0 || path.bounce_count > self.params.max_bounces + 1
        {
            return None;
        }

        let terminal = path.bounce_count - 1;

        if let Some(reconnection) = &path.reconnection {
            if reconnection.bounce == 0 || reconnection.bounce > terminal {
                return None;
            }
        }

        let mut rng = WhiteNoise::from_state(into.seed);
        let jitter = rng.sample2();
        let ray = self.scene.camera_ray(pixel, jitter);
        let mut rng = WhiteNoise::from_state(path.seed);
        let hit = self.scene.trace(ray);

        let shifted = |f: Vec3, jacobian: Jacobian| {
            (f.is_finite() && f.is_lit()).then(|| PathInfo {
                f,
                first_vertex_seed: into.seed,
                jacobian,
                ..*path
            })
        };

        if hit.is_none() {
            let is_valid = terminal == 0
                && path.termination == PathTermination::EscapedToEnvmap
                && path.reconnection.is_none();

            return if is_valid {
                shifted(self.scene.environment(ray.direction()), Jacobian::ONE)
            } else {
                None
            };
        }

        let mut curr = PathVertex::new(
            self.scene.vertex(hit.triangle_id, hit.barycentrics),
            ray,
            Vec3::ONE,
            0.0,
            false,
            self.params.min_roughness,
        );

        if terminal == 0 {
            return if path.termination == PathTermination::BrdfSampled {
                shifted(curr.emission(), Jacobian::ONE)
            } else {
                None
            };
        }

        for bounce in 0..terminal {
            let u_light = rng.sample3();
            let u_brdf = rng.sample2();

            if let Some(reconnection) = &path.reconnection {
                if reconnection.bounce == bounce + 1 {
                    if curr.lobe() != reconnection.lobes.prev {
                        return None;
                    }

                    let (f, jacobian) = self.reconnect(
                        &curr,
                        reconnection,
                        path.termination,
                        path.bounce_count,
                        None,
                    )?;

                    return shifted(f, jacobian);
                }
            }

            if bounce + 1 == terminal {
                let f = self.replay_end(&curr, path.termination, u_light, u_brdf)?;

                return shifted(f, Jacobian::ONE);
            }

            let sample = curr.brdf().sample(curr.wo, u_brdf)?;
            let ray = curr.vertex.ray_towards(sample.direction);
            let hit = self.scene.trace(ray);

            if hit.is_none() {
                return None;
            }

            let next = PathVertex::new(
                self.scene.vertex(hit.triangle_id, hit.barycentrics),
                ray,
                curr.throughput * sample.weight,
                sample.pdf,
                sample.is_delta,
                self.params.min_roughness,
            );

            // If this vertex could serve as the reconnection vertex, it would
            // have been picked as one
            if self.is_interior_anchor(&curr, &next) {
                return None;
            }

            curr = next;
        }

        None
    }

    /// Replays the last segment of a path without reconnection vertex,
    /// starting at `curr`; returns the path's contribution.
    fn replay_end(
        &self,
        curr: &PathVertex,
        termination: PathTermination,
        u_light: Vec3,
        u_brdf: Vec2,
    ) -> Option<Vec3> {
        match termination {
            PathTermination::LightSampled | PathTermination::EnvmapSampled => {
                let light = self.next_event(curr, u_light)?;

                if light.termination != termination
                    || self.is_endpoint_anchor(curr, light.distance)
                {
                    return None;
                }

                Some(curr.throughput * light.value)
            }

            PathTermination::BrdfSampled => {
                let sample = curr.brdf().sample(curr.wo, u_brdf)?;
                let ray = curr.vertex.ray_towards(sample.direction);
                let hit = self.scene.trace(ray);

                if hit.is_none() {
                    return None;
                }

                let next = PathVertex::new(
                    self.scene.vertex(hit.triangle_id, hit.barycentrics),
                    ray,
                    curr.throughput * sample.weight,
                    sample.pdf,
                    sample.is_delta,
                    self.params.min_roughness,
                );

                if self.is_endpoint_anchor(curr, curr.point().distance(next.point()))
                {
                    return None;
                }

                let (emission, _, mis) = self.emission(curr, &next);

                Some(next.throughput * mis * emission)
            }

            PathTermination::EscapedToEnvmap => {
                let sample = curr.brdf().sample(curr.wo, u_brdf)?;
                let hit = self.scene.trace(curr.vertex.ray_towards(sample.direction));

                if hit.is_some() || self.is_endpoint_anchor(curr, f32::INFINITY) {
                    return None;
                }

                let (emission, _, mis) = self.escape(&sample);

                Some(curr.throughput * sample.weight * mis * emission)
            }
        }
    }
}

impl<S> ShiftMapping for PathTracer<'_, S>
where
    S: Scene,
{
    fn shift(
        &self,
        path: &PathInfo,
        _from: &Domain,
        into: &Domain,
    ) -> Option<Shift> {
        let shifted = self.replay(path, into)?;
        let jacobian = path.jacobian.ratio(shifted.jacobian);

        if jacobian > 0.0 && jacobian.is_finite() {
            Some(Shift {
                path: shifted,
                jacobian,
            })
        } else {
            None
        }
    }
}
