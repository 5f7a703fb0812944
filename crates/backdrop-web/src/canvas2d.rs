//! `Canvas2d` over the browser's `CanvasRenderingContext2d`.
//!
//! Offscreen layers are detached canvas elements with their own 2D context.
//! They are never attached to the document.

use backdrop_core::{BackdropError, Canvas2d, ColorStop, Composite, LayerId, Paint};
use glam::Vec2;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Layer {
    element: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

pub struct WebCanvas {
    element: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    document: web::Document,
    layers: HashMap<LayerId, Layer>,
    next_layer: u32,
}

impl WebCanvas {
    pub fn new(
        element: web::HtmlCanvasElement,
        document: web::Document,
    ) -> Result<Self, BackdropError> {
        let ctx = context_2d(&element).ok_or(BackdropError::ContextUnavailable)?;
        Ok(Self {
            element,
            ctx,
            document,
            layers: HashMap::new(),
            next_layer: 0,
        })
    }

    fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    fn gradient_stops(gradient: &web::CanvasGradient, stops: &[ColorStop]) {
        for s in stops {
            if let Err(e) = gradient.add_color_stop(s.offset.clamp(0.0, 1.0), &s.color.to_css()) {
                log::debug!("[canvas] rejected colour stop {:?}: {e:?}", s.color);
            }
        }
    }
}

fn context_2d(element: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    element
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|obj| obj.dyn_into::<web::CanvasRenderingContext2d>().ok())
}

impl Canvas2d for WebCanvas {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.element.set_width(width);
        self.element.set_height(height);
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        let style = self.element.style();
        for (prop, value) in [("width", width), ("height", height)] {
            if let Err(e) = style.set_property(prop, &format!("{value}px")) {
                log::warn!("[surface] could not set canvas {prop}: {e:?}");
            }
        }
    }

    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        let _ = self.ctx.set_transform(
            a as f64, b as f64, c as f64, d as f64, e as f64, f as f64,
        );
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }

    fn set_composite(&mut self, op: Composite) {
        let _ = self.ctx.set_global_composite_operation(op.as_css());
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::Linear { from, to, stops } => {
                let g = self.ctx.create_linear_gradient(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                );
                Self::gradient_stops(&g, stops);
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
            Paint::Radial {
                center,
                radius,
                stops,
            } => {
                let (x, y) = (center.x as f64, center.y as f64);
                match self
                    .ctx
                    .create_radial_gradient(x, y, 0.0, x, y, radius.max(0.0) as f64)
                {
                    Ok(g) => {
                        Self::gradient_stops(&g, stops);
                        self.ctx.set_fill_style_canvas_gradient(&g);
                    }
                    Err(e) => log::debug!("[canvas] radial gradient failed: {e:?}"),
                }
            }
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.close_path();
        ctx.fill();
    }

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let r = radius.clamp(0.0, w.min(h) * 0.5) as f64;
        let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
        ctx.fill();
    }

    fn create_layer(&mut self, width: u32, height: u32) -> Result<LayerId, BackdropError> {
        let unavailable = || BackdropError::LayerUnavailable { width, height };
        let element = self
            .document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
            .ok_or_else(unavailable)?;
        element.set_width(width.max(1));
        element.set_height(height.max(1));
        let ctx = context_2d(&element).ok_or_else(unavailable)?;

        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers.insert(id, Layer { element, ctx });
        log::debug!("[canvas] layer {} allocated {width}x{height}", id.0);
        Ok(id)
    }

    fn resize_layer(&mut self, id: LayerId, width: u32, height: u32) -> Result<(), BackdropError> {
        let layer = self.layer(id).ok_or(BackdropError::UnknownLayer(id))?;
        layer.element.set_width(width.max(1));
        layer.element.set_height(height.max(1));
        Ok(())
    }

    fn release_layer(&mut self, id: LayerId) {
        if let Some(layer) = self.layers.remove(&id) {
            // zero-size frees the backing store
            layer.element.set_width(0);
            layer.element.set_height(0);
        }
    }

    fn snapshot_into(&mut self, id: LayerId) {
        let Some(layer) = self.layer(id) else {
            return;
        };
        let (w, h) = (layer.element.width() as f64, layer.element.height() as f64);
        layer.ctx.clear_rect(0.0, 0.0, w, h);
        let _ = layer
            .ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(&self.element, 0.0, 0.0, w, h);
    }

    fn blur_layer(&mut self, src: LayerId, dst: LayerId, radius: f32) {
        let (Some(src), Some(dst)) = (self.layer(src), self.layer(dst)) else {
            return;
        };
        let (w, h) = (dst.element.width() as f64, dst.element.height() as f64);
        dst.ctx.clear_rect(0.0, 0.0, w, h);
        dst.ctx.set_filter(&format!("blur({radius:.1}px)"));
        let _ = dst
            .ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(&src.element, 0.0, 0.0, w, h);
        dst.ctx.set_filter("none");
    }

    fn draw_layer(&mut self, id: LayerId, x: f32, y: f32, w: f32, h: f32) {
        let Some(layer) = self.layer(id) else {
            return;
        };
        let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &layer.element,
            x as f64,
            y as f64,
            w as f64,
            h as f64,
        );
    }
}
