use glam::{uvec2, UVec2};
use log::trace;
use rayon::prelude::*;

use crate::gpu::{Kernel, Lane, WORKGROUP_SIZE};
use crate::{measure, Error};

/// Schedules a kernel over the camera's viewport, one lane per pixel.
#[derive(Debug)]
pub struct CameraComputePass {
    label: String,
}

impl CameraComputePass {
    pub fn new(label: impl ToString) -> Self {
        let label = label.to_string();

        log::debug!("Initializing pass: {}", label);

        Self { label }
    }

    /// Runs `kernel` for every pixel of a `size`-sized viewport.
    ///
    /// Lanes are grouped into 8x8 workgroups; the viewport gets rounded up
    /// to whole workgroups and lanes that land outside of it compute on a
    /// clamped pixel, but never commit. Commits happen only after every lane
    /// has finished computing, so `kernel` can't observe its own writes.
    pub fn run<K>(
        &self,
        size: UVec2,
        kernel: &K,
        items: &mut [K::Item],
    ) -> Result<(), Error>
    where
        K: Kernel,
    {
        let expected = (size.x * size.y) as usize;

        if items.len() != expected {
            return Err(Error::BufferSizeMismatch {
                pass: self.label.clone(),
                expected,
                actual: items.len(),
            });
        }

        let groups = (size + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE;

        trace!(
            "Dispatching pass `{}`: {}x{} workgroups",
            self.label,
            groups.x,
            groups.y
        );

        measure(&self.label, || {
            let outputs: Vec<_> = (0..groups.x * groups.y)
                .into_par_iter()
                .flat_map_iter(|group_idx| {
                    let group_id =
                        uvec2(group_idx % groups.x, group_idx / groups.x);

                    (0..WORKGROUP_SIZE * WORKGROUP_SIZE).map(move |local_idx| {
                        let local_id = uvec2(
                            local_idx % WORKGROUP_SIZE,
                            local_idx / WORKGROUP_SIZE,
                        );

                        let lane =
                            Lane::new(group_id * WORKGROUP_SIZE + local_id, size);

                        (lane, kernel.compute(lane))
                    })
                })
                .collect();

            for (lane, output) in outputs {
                if lane.in_bounds {
                    let idx = (lane.screen_pos.y * size.x + lane.screen_pos.x)
                        as usize;

                    kernel.commit(lane, output, &mut items[idx]);
                }
            }
        });

        Ok(())
    }
}
