//! Test harness around a full [`EditorContext`] with the stock pipeline.
//!
//! Gestures take screen coordinates, exactly as a host would deliver them; the
//! `*_screen` helpers convert world geometry through the current viewport.

#![allow(dead_code)]

use super::{FrameRecorder, StubImageProvider};
use image_flow_canvas::{
    CanvasConfig, Command, CubicBezier, EditorContext, GraphModel, NodeId, NodeKind, PointerButtons,
    PointerEvent, PortId, Response,
};

pub struct CanvasHarness {
    pub context: EditorContext,
    pub frames: FrameRecorder,
    pub images: StubImageProvider,
}

impl CanvasHarness {
    /// Stock pipeline, default config, an 800x600 canvas
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        let frames = FrameRecorder::new();
        let images = StubImageProvider::new();
        let mut context = EditorContext::standard(
            Box::new(images.clone()),
            config,
            Box::new(frames.clone()),
        );
        context.resize(800.0, 600.0);
        frames.clear();
        Self { context, frames, images }
    }

    pub fn graph(&self) -> &GraphModel {
        self.context.graph()
    }

    // === Lookups ===

    pub fn node(&self, kind: NodeKind) -> NodeId {
        self.graph().node_of_kind(kind).unwrap()
    }

    pub fn input_port(&self, kind: NodeKind) -> PortId {
        self.graph().node(self.node(kind)).unwrap().input_ports()[0]
    }

    pub fn output_port(&self, kind: NodeKind) -> PortId {
        self.graph().node(self.node(kind)).unwrap().output_ports()[0]
    }

    pub fn position(&self, kind: NodeKind) -> (f32, f32) {
        self.graph().node(self.node(kind)).unwrap().position()
    }

    /// (input count, output count)
    pub fn image_counts(&self, kind: NodeKind) -> (usize, usize) {
        let node = self.graph().node(self.node(kind)).unwrap();
        (node.input_images().len(), node.output_images().len())
    }

    pub fn output_names(&self, kind: NodeKind) -> Vec<String> {
        let node = self.graph().node(self.node(kind)).unwrap();
        node.output_images().names().to_vec()
    }

    pub fn input_names(&self, kind: NodeKind) -> Vec<String> {
        let node = self.graph().node(self.node(kind)).unwrap();
        node.input_images().names().to_vec()
    }

    // === Screen geometry ===

    pub fn to_screen(&self, world: (f32, f32)) -> (f32, f32) {
        self.context.viewport().to_screen(world)
    }

    pub fn port_screen(&self, port: PortId) -> (f32, f32) {
        self.to_screen(self.graph().port_center(port).unwrap())
    }

    /// A point inside the node's title area, clear of its ports
    pub fn node_grab_screen(&self, kind: NodeKind) -> (f32, f32) {
        let rect = self.graph().node_rect(self.node(kind)).unwrap();
        self.to_screen((rect.x + rect.width / 2.0, rect.y + 10.0))
    }

    // === Gestures ===

    pub fn down(&mut self, position: (f32, f32), buttons: PointerButtons) -> Response {
        self.context.handle_pointer(PointerEvent::Down { position, buttons })
    }

    pub fn move_to(&mut self, position: (f32, f32)) -> Response {
        self.context.handle_pointer(PointerEvent::Move { position })
    }

    pub fn up(&mut self, position: (f32, f32)) -> Response {
        self.context.handle_pointer(PointerEvent::Up { position })
    }

    pub fn click(&mut self, position: (f32, f32)) -> Response {
        let response = self.down(position, PointerButtons::LEFT);
        self.up(position);
        response
    }

    pub fn right_click(&mut self, position: (f32, f32)) -> Response {
        let response = self.down(position, PointerButtons::RIGHT);
        self.up(position);
        response
    }

    pub fn wheel(&mut self, notch: i32) -> Response {
        self.context.handle_pointer(PointerEvent::Wheel { notch })
    }

    /// Left-drag from `from` to `to` in `steps` moves
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32), steps: usize) {
        self.down(from, PointerButtons::LEFT);
        self.move_in_steps(from, to, steps);
        self.up(to);
    }

    /// Middle-drag by `delta` starting at `from`
    pub fn pan(&mut self, from: (f32, f32), delta: (f32, f32), steps: usize) {
        let to = (from.0 + delta.0, from.1 + delta.1);
        self.down(from, PointerButtons::MIDDLE);
        self.move_in_steps(from, to, steps);
        self.up(to);
    }

    fn move_in_steps(&mut self, from: (f32, f32), to: (f32, f32), steps: usize) {
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.move_to((from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t));
        }
    }

    /// Click the source's output port, then the destination's input port
    pub fn connect(&mut self, from: NodeKind, to: NodeKind) {
        let start = self.port_screen(self.output_port(from));
        self.click(start);
        let end = self.port_screen(self.input_port(to));
        self.click(end);
    }

    /// Right-click the middle of the connection between two stages
    pub fn disconnect(&mut self, from: NodeKind, to: NodeKind) -> Response {
        let (output, input) = (self.output_port(from), self.input_port(to));
        let connection = self
            .graph()
            .connections()
            .iter()
            .find(|c| c.output == output && c.input == input)
            .map(|c| c.id)
            .unwrap();
        let (start, end) = self.graph().connection_endpoints(connection).unwrap();
        let middle = self.to_screen(CubicBezier::from_endpoints(start, end).eval(0.5));
        self.right_click(middle)
    }

    pub fn execute(&mut self, command: Command) -> Response {
        self.context.execute(command)
    }
}
