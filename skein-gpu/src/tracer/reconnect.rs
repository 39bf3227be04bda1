use glam::Vec3;

use super::PathVertex;
use crate::{
    balance_heuristic, Brdf, Hit, Jacobian, PathTermination, PathTracer,
    Reconnection, ReconnectionVertex, Scene, Vec3Ext,
};

impl<S> PathTracer<'_, S>
where
    S: Scene,
{
    /// Connects `from` (the vertex preceding the reconnection vertex) to the
    /// reconnection vertex and returns the contribution of the whole path,
    /// together with its Jacobian pair.
    ///
    /// Both the forward trace and the shift go through here, so a path
    /// reconnected to its own domain gets precisely the same numbers.
    ///
    /// `hit` is the result of tracing from `from` towards the reconnection
    /// vertex, if the caller has already traced that ray.
    pub(super) fn reconnect(
        &self,
        from: &PathVertex,
        reconnection: &Reconnection,
        termination: PathTermination,
        bounce_count: u32,
        hit: Option<Hit>,
    ) -> Option<(Vec3, Jacobian)> {
        if !from.is_rough {
            return None;
        }

        let is_endpoint = reconnection.is_endpoint(bounce_count);

        let (f, jacobian) = match reconnection.vertex {
            ReconnectionVertex::Surface {
                triangle_id,
                barycentrics,
            } => {
                let anchor = self.scene.vertex(triangle_id, barycentrics);
                let offset = anchor.point - from.point();
                let distance = offset.length();

                if !(distance > self.params.min_reconnection_distance) {
                    return None;
                }

                let dir = offset / distance;

                let hit = hit.unwrap_or_else(|| {
                    self.scene.trace(from.vertex.ray_towards(dir))
                });

                if hit.is_none() || hit.triangle_id != triangle_id {
                    return None;
                }

                let eval = from.brdf().eval(from.wo, dir);

                if eval.pdf <= 0.0 {
                    return None;
                }

                let cos = anchor.normal.dot(dir).abs();
                let geometry = cos / (distance * distance);

                if is_endpoint {
                    let emission = anchor.emission_towards(-dir);
                    let light_pdf = self.scene.light_pdf(from.point(), &anchor);

                    match termination {
                        PathTermination::LightSampled => {
                            if light_pdf <= 0.0 {
                                return None;
                            }

                            let mis = balance_heuristic(light_pdf, eval.pdf);

                            (
                                eval.value * (mis / light_pdf) * emission,
                                Jacobian::new(light_pdf * geometry, 1.0),
                            )
                        }

                        PathTermination::BrdfSampled => {
                            let mis = balance_heuristic(eval.pdf, light_pdf);

                            (
                                eval.value * (mis / eval.pdf) * emission,
                                Jacobian::new(eval.pdf, geometry),
                            )
                        }

                        _ => return None,
                    }
                } else {
                    let wo = -dir;
                    let wi = reconnection.radiance_direction;
                    let brdf = Brdf::new(&anchor.material, anchor.normal_towards(wo));
                    let anchor_eval = brdf.eval(wo, wi);

                    let ends_right_after = bounce_count == reconnection.bounce + 2;

                    let (factor, pdf) = if ends_right_after
                        && termination.is_light_sampled()
                    {
                        if reconnection.light_pdf <= 0.0 {
                            return None;
                        }

                        let mis = balance_heuristic(
                            reconnection.light_pdf,
                            anchor_eval.pdf,
                        );

                        (
                            anchor_eval.value * (mis / reconnection.light_pdf),
                            eval.pdf,
                        )
                    } else {
                        if anchor_eval.pdf <= 0.0 {
                            return None;
                        }

                        let mis = if ends_right_after {
                            balance_heuristic(
                                anchor_eval.pdf,
                                reconnection.light_pdf,
                            )
                        } else {
                            1.0
                        };

                        (
                            anchor_eval.value * (mis / anchor_eval.pdf),
                            eval.pdf * anchor_eval.pdf,
                        )
                    };

                    (
                        eval.value / eval.pdf * factor * reconnection.radiance,
                        Jacobian::new(pdf, geometry),
                    )
                }
            }

            ReconnectionVertex::Environment { direction } => {
                if !is_endpoint {
                    return None;
                }

                let hit = hit.unwrap_or_else(|| {
                    self.scene.trace(from.vertex.ray_towards(direction))
                });

                if hit.is_some() {
                    return None;
                }

                let eval = from.brdf().eval(from.wo, direction);

                if eval.pdf <= 0.0 {
                    return None;
                }

                let emission = self.scene.environment(direction);
                let env_pdf = self.scene.environment_pdf();

                match termination {
                    PathTermination::EnvmapSampled => {
                        if env_pdf <= 0.0 {
                            return None;
                        }

                        let mis = balance_heuristic(env_pdf, eval.pdf);

                        (
                            eval.value * (mis / env_pdf) * emission,
                            Jacobian::new(env_pdf, 1.0),
                        )
                    }

                    PathTermination::EscapedToEnvmap => {
                        let mis = balance_heuristic(eval.pdf, env_pdf);

                        (
                            eval.value * (mis / eval.pdf) * emission,
                            Jacobian::new(eval.pdf, 1.0),
                        )
                    }

                    _ => return None,
                }
            }
        };

        let f = from.throughput * f;

        if !f.is_finite() || f.luma() <= 0.0 {
            return None;
        }

        let jacobian_value = jacobian.value();

        if !(jacobian_value.is_finite() && jacobian_value > 0.0) {
            return None;
        }

        Some((f, jacobian))
    }
}
