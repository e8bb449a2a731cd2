//! The editor as one explicit object.
//!
//! [`EditorContext`] owns the graph, the viewport, the interaction controller and the
//! render adapter, and is the single entry point for host events: pointer input goes
//! through [`handle_pointer`](EditorContext::handle_pointer), menu commands through
//! [`execute`](EditorContext::execute). Whenever something visible changed the adapter
//! is handed a fresh [`FrameSnapshot`].
//!
//! Slint callbacks want `'static` closures, so [`SharedEditor`] wraps the context in
//! `Rc<RefCell<_>>` and hands out callback factories:
//!
//! ```ignore
//! let editor = SharedEditor::new(EditorContext::standard(
//!     Box::new(FileImageProvider::new(".")),
//!     CanvasConfig::load_or_default("canvas.json5"),
//!     Box::new(adapter),
//! ));
//!
//! window.on_pointer_down(editor.pointer_down_callback());
//! window.on_pointer_move(editor.pointer_move_callback());
//! window.on_pointer_up(editor.pointer_up_callback());
//! window.on_wheel(editor.wheel_callback());
//! window.on_canvas_resized(editor.resize_callback());
//! window.on_clear_connections(editor.command_callback(Command::ClearAllConnections));
//! window.on_reset_nodes(editor.command_callback(Command::ResetAllNodes));
//! window.on_reset_view(editor.command_callback(Command::ResetView));
//! ```
//!
//! The adapter runs while the context is borrowed; it must not call back into the
//! `SharedEditor`.

use crate::config::CanvasConfig;
use crate::controller::{InteractionController, InteractionState, PointerButtons, PointerEvent, Response};
use crate::graph::{GraphModel, Node};
use crate::image::ImageProvider;
use crate::render::{FrameSnapshot, RenderAdapter};
use crate::viewport::Viewport;
use std::cell::RefCell;
use std::rc::Rc;

/// Menu-level operations, one per graph/viewport operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClearAllConnections,
    ResetAllNodes,
    /// Replace the Origin's outputs with these identifiers
    LoadOriginImages(Vec<String>),
    ResetView,
}

pub struct EditorContext {
    graph: GraphModel,
    viewport: Viewport,
    controller: InteractionController,
    adapter: Box<dyn RenderAdapter>,
    canvas_size: (f32, f32),
    status: Option<String>,
}

impl EditorContext {
    pub fn new(graph: GraphModel, adapter: Box<dyn RenderAdapter>) -> Self {
        let viewport = Viewport::new(graph.config().viewport.clone());
        Self {
            graph,
            viewport,
            controller: InteractionController::new(),
            adapter,
            canvas_size: (0.0, 0.0),
            status: None,
        }
    }

    /// Context around the stock six-node pipeline
    pub fn standard(
        provider: Box<dyn ImageProvider>,
        config: CanvasConfig,
        adapter: Box<dyn RenderAdapter>,
    ) -> Self {
        Self::new(GraphModel::standard_pipeline(provider, config), adapter)
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// Direct access for scripted setups. Call [`redraw`](Self::redraw) afterwards.
    pub fn graph_mut(&mut self) -> &mut GraphModel {
        &mut self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        self.canvas_size
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(
            &self.graph,
            &self.viewport,
            &self.controller,
            self.canvas_size,
            self.status.as_deref(),
        )
    }

    pub fn redraw(&mut self) {
        let frame = self.snapshot();
        self.adapter.render(&frame);
    }

    /// Feed one pointer event through the controller; redraws when it asks for it
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Response {
        let response = self.controller.handle(event, &mut self.graph, &mut self.viewport);
        if let Some(connection) = self.controller.take_removed() {
            let title = |port| self.graph.port_owner(port).map(Node::title).unwrap_or("?");
            self.status = Some(format!(
                "Connection removed: {}→{}",
                title(connection.output),
                title(connection.input)
            ));
        }
        if response == Response::Redraw {
            self.redraw();
        }
        response
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Response {
        if self.canvas_size == (width, height) {
            return Response::Ignored;
        }
        self.canvas_size = (width, height);
        self.redraw();
        Response::Redraw
    }

    pub fn execute(&mut self, command: Command) -> Response {
        log::debug!("executing {command:?}");
        let changed = match command {
            Command::ClearAllConnections => {
                self.graph.clear_all_connections();
                self.status = Some("All connections removed".to_string());
                true
            }
            Command::ResetAllNodes => {
                self.graph.reset_all();
                self.status = Some("All nodes reset".to_string());
                true
            }
            Command::LoadOriginImages(identifiers) => {
                let count = identifiers.len();
                let loaded = self.graph.load_origin_images(identifiers);
                if loaded {
                    self.status = Some(format!("Loaded {count} origin images"));
                }
                loaded
            }
            Command::ResetView => self.viewport.reset(),
        };
        if changed {
            self.redraw();
            Response::Redraw
        } else {
            Response::Ignored
        }
    }
}

/// Cloneable handle for host callbacks on the UI thread.
#[derive(Clone)]
pub struct SharedEditor {
    inner: Rc<RefCell<EditorContext>>,
}

impl SharedEditor {
    pub fn new(context: EditorContext) -> Self {
        Self { inner: Rc::new(RefCell::new(context)) }
    }

    /// Run `f` with the context borrowed
    pub fn with<R>(&self, f: impl FnOnce(&mut EditorContext) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    pub fn handle_pointer(&self, event: PointerEvent) -> Response {
        self.inner.borrow_mut().handle_pointer(event)
    }

    pub fn execute(&self, command: Command) -> Response {
        self.inner.borrow_mut().execute(command)
    }

    // === Callback factories ===

    /// Returns a callback for pointer presses: `(x, y, left, middle, right)`
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32, bool, bool, bool) {
        let inner = self.inner.clone();
        move |x, y, left, middle, right| {
            inner.borrow_mut().handle_pointer(PointerEvent::Down {
                position: (x, y),
                buttons: PointerButtons { left, middle, right },
            });
        }
    }

    /// Returns a callback for pointer motion: `(x, y)`
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().handle_pointer(PointerEvent::Move { position: (x, y) });
        }
    }

    /// Returns a callback for pointer releases: `(x, y)`
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().handle_pointer(PointerEvent::Up { position: (x, y) });
        }
    }

    /// Returns a callback for wheel notches
    pub fn wheel_callback(&self) -> impl Fn(i32) {
        let inner = self.inner.clone();
        move |notch| {
            inner.borrow_mut().handle_pointer(PointerEvent::Wheel { notch });
        }
    }

    /// Returns a callback for canvas size changes: `(width, height)`
    pub fn resize_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |width, height| {
            inner.borrow_mut().resize(width, height);
        }
    }

    /// Returns a callback that runs `command` each time it fires
    pub fn command_callback(&self, command: Command) -> impl Fn() {
        let inner = self.inner.clone();
        move || {
            inner.borrow_mut().execute(command.clone());
        }
    }
}
