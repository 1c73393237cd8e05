use crate::core::constants::{CORE_GRADIENT_RADIUS, HALO_ALPHA_SCALE, HALO_GRADIENT_RADIUS};
use crate::core::{BlendMode, DrawError, FrameSurface, Particle, ParticleCanvas};
use wasm_bindgen::{Clamped, JsValue};
use web_sys as web;

fn surface_err(e: JsValue) -> DrawError {
    DrawError::Surface(format!("{:?}", e))
}

/// Two stacked 2D canvases: video frames below, ash particles above.
pub struct CanvasSurface {
    video: web::HtmlVideoElement,
    frame_canvas: web::HtmlCanvasElement,
    frame: web::CanvasRenderingContext2d,
    overlay_canvas: web::HtmlCanvasElement,
    overlay: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(
        video: web::HtmlVideoElement,
        frame_canvas: web::HtmlCanvasElement,
        overlay_canvas: web::HtmlCanvasElement,
    ) -> anyhow::Result<Self> {
        let frame = crate::dom::context_2d(&frame_canvas)?;
        let overlay = crate::dom::context_2d(&overlay_canvas)?;
        Ok(Self {
            video,
            frame_canvas,
            frame,
            overlay_canvas,
            overlay,
        })
    }

    pub fn overlay_canvas(&self) -> &web::HtmlCanvasElement {
        &self.overlay_canvas
    }

    fn fill_gradient(&self, radius: f64, stops: &[(f32, &str)]) -> Result<(), JsValue> {
        let gradient = self
            .overlay
            .create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, radius)?;
        for (offset, color) in stops {
            gradient.add_color_stop(*offset, color)?;
        }
        self.overlay.set_fill_style_canvas_gradient(&gradient);
        self.overlay.fill();
        Ok(())
    }

    fn try_draw_particle(&self, p: &Particle) -> Result<(), JsValue> {
        let ctx = &self.overlay;
        let Some((first, rest)) = p.outline.split_first() else {
            return Ok(());
        };
        ctx.save();
        ctx.translate(f64::from(p.position.x), f64::from(p.position.y))?;
        ctx.rotate(f64::from(p.rotation))?;
        ctx.set_global_alpha(f64::from(p.alpha));

        ctx.begin_path();
        ctx.move_to(f64::from(first.x), f64::from(first.y));
        for v in rest {
            ctx.line_to(f64::from(v.x), f64::from(v.y));
        }
        ctx.close_path();

        let size = f64::from(p.size);
        self.fill_gradient(
            size * f64::from(CORE_GRADIENT_RADIUS),
            &[
                (0.0, "rgba(255, 255, 255, 0.8)"),
                (0.5, "rgba(200, 200, 200, 0.4)"),
                (1.0, "rgba(150, 150, 150, 0)"),
            ],
        )?;

        // Halo reuses the outline path with a wider, fainter gradient
        ctx.set_global_alpha(f64::from(p.alpha * HALO_ALPHA_SCALE));
        self.fill_gradient(
            size * f64::from(HALO_GRADIENT_RADIUS),
            &[(0.0, "rgba(255, 255, 255, 0.2)"), (1.0, "rgba(255, 255, 255, 0)")],
        )?;

        ctx.restore();
        Ok(())
    }
}

impl FrameSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.frame_canvas.width(), self.frame_canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.frame_canvas.set_width(width);
        self.frame_canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.frame.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn draw_frame(&mut self, offset_x: f64) -> Result<(), DrawError> {
        if self.video.ready_state() < 2 {
            return Err(DrawError::SourceNotReady);
        }
        self.frame
            .draw_image_with_html_video_element(&self.video, offset_x, 0.0)
            .map_err(surface_err)
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let op = match mode {
            BlendMode::SourceOver => "source-over",
            BlendMode::Lighter => "lighter",
        };
        _ = self.frame.set_global_composite_operation(op);
    }

    fn with_pixels(&mut self, f: &mut dyn FnMut(&mut [u8])) -> Result<(), DrawError> {
        let (w, h) = self.size();
        let image = self
            .frame
            .get_image_data(0.0, 0.0, f64::from(w), f64::from(h))
            .map_err(surface_err)?;
        let Clamped(mut data) = image.data();
        f(&mut data[..]);
        let out = web::ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data[..]), w, h)
            .map_err(surface_err)?;
        self.frame.put_image_data(&out, 0.0, 0.0).map_err(surface_err)
    }
}

impl ParticleCanvas for CanvasSurface {
    fn begin_particles(&mut self) {
        let w = f64::from(self.overlay_canvas.width());
        let h = f64::from(self.overlay_canvas.height());
        self.overlay.clear_rect(0.0, 0.0, w, h);
    }

    fn draw_particle(&mut self, particle: &Particle) {
        if let Err(e) = self.try_draw_particle(particle) {
            self.overlay.restore();
            log::debug!("[particles] draw error: {:?}", e);
        }
    }
}
