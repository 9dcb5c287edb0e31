use anyhow::Result;

use crate::device::WgpuBackend;
use crate::example::Example;

use super::common::{begin_clear_pass, clear_color, hsv_to_rgb};

/// Clears the target to a slowly cycling hue. Allocates no GPU resources.
#[derive(Debug, Default)]
pub struct ClearColor {
    hue: f32,
}

impl ClearColor {
    /// Full hue cycles per second.
    const SPEED: f32 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    fn rgb(&self) -> [f64; 3] {
        hsv_to_rgb(self.hue, 0.6, 0.9).map(f64::from)
    }
}

impl Example<WgpuBackend> for ClearColor {
    fn name(&self) -> &'static str {
        "clear-color"
    }

    fn activate(&mut self, _gpu: &WgpuBackend) -> Result<()> {
        self.hue = 0.0;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.hue = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.hue = (self.hue + dt * Self::SPEED).rem_euclid(1.0);
    }

    fn record(&mut self, gpu: &WgpuBackend, encoder: &mut wgpu::CommandEncoder) {
        let _pass = begin_clear_pass(
            encoder,
            "inapp clear-color pass",
            gpu.target_view(),
            None,
            clear_color(self.rgb()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_around() {
        let mut ex = ClearColor::new();
        for _ in 0..25 {
            ex.advance(1.0);
        }
        assert!((0.0..1.0).contains(&ex.hue));
        assert!((ex.hue - 0.5).abs() < 1e-4);
    }

    #[test]
    fn deactivate_resets_animation() {
        let mut ex = ClearColor::new();
        ex.advance(2.0);
        ex.deactivate();
        assert_eq!(ex.hue, 0.0);
    }
}
