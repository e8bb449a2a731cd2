//! Pointer-driven interaction state machine.
//!
//! The [`InteractionController`] turns raw pointer events into panning, node dragging,
//! and connecting or disconnecting ports. It owns no model data: every event is applied
//! to the [`GraphModel`] and [`Viewport`] passed in, and the returned [`Response`] tells
//! the host whether a redraw is needed.
//!
//! ```ignore
//! let mut controller = InteractionController::new();
//! let response = controller.handle(
//!     PointerEvent::Down { position: (120.0, 80.0), buttons: PointerButtons::LEFT },
//!     &mut graph,
//!     &mut viewport,
//! );
//! if response == Response::Redraw {
//!     // repaint
//! }
//! ```
//!
//! Positions in events are screen pixels; everything handed to the graph is world space.

use crate::graph::{Connection, GraphModel, NodeId, PortId};
use crate::viewport::Viewport;

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Middle button held. A connection started before the press resumes on release.
    Panning { pending: Option<PortId> },
    DraggingNode(NodeId),
    /// A rubber band runs from this port to the cursor.
    ConnectingFrom(PortId),
}

/// Which buttons are held for a `Down` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl PointerButtons {
    pub const LEFT: Self = Self { left: true, middle: false, right: false };
    pub const MIDDLE: Self = Self { left: false, middle: true, right: false };
    pub const RIGHT: Self = Self { left: false, middle: false, right: true };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: (f32, f32), buttons: PointerButtons },
    Move { position: (f32, f32) },
    Up { position: (f32, f32) },
    /// Positive zooms in, anything else zooms out.
    Wheel { notch: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Redraw,
    Ignored,
}

impl Response {
    fn redraw_if(changed: bool) -> Self {
        if changed {
            Response::Redraw
        } else {
            Response::Ignored
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    /// Screen position of the last `Down` or `Move`
    last_position: (f32, f32),
    /// Connection removed by the last right-click, until taken
    removed: Option<Connection>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn last_position(&self) -> (f32, f32) {
        self.last_position
    }

    /// The port a connection is pending from, including while panning
    pub fn pending_port(&self) -> Option<PortId> {
        match self.state {
            InteractionState::ConnectingFrom(port) => Some(port),
            InteractionState::Panning { pending } => pending,
            _ => None,
        }
    }

    /// Port the rubber band starts at and the cursor in world space, while connecting
    pub fn rubber_band(
        &self,
        graph: &GraphModel,
        viewport: &Viewport,
    ) -> Option<((f32, f32), (f32, f32))> {
        let port = self.pending_port()?;
        Some((graph.port_center(port)?, viewport.to_world(self.last_position)))
    }

    /// Drop a pending connection. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            InteractionState::ConnectingFrom(_) => self.set_state(InteractionState::Idle),
            InteractionState::Panning { pending: Some(_) } => {
                self.set_state(InteractionState::Panning { pending: None })
            }
            _ => return false,
        }
        true
    }

    /// The connection the last right-click removed, if it has not been taken yet
    pub fn take_removed(&mut self) -> Option<Connection> {
        self.removed.take()
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        graph: &mut GraphModel,
        viewport: &mut Viewport,
    ) -> Response {
        match event {
            PointerEvent::Down { position, buttons } => {
                self.last_position = position;
                self.pointer_down(position, buttons, graph, viewport)
            }
            PointerEvent::Move { position } => {
                let delta = (position.0 - self.last_position.0, position.1 - self.last_position.1);
                self.last_position = position;
                self.pointer_move(delta, graph, viewport)
            }
            PointerEvent::Up { .. } => {
                match self.state {
                    InteractionState::Panning { pending: Some(port) } => {
                        self.set_state(InteractionState::ConnectingFrom(port))
                    }
                    InteractionState::Panning { pending: None } | InteractionState::DraggingNode(_) => {
                        self.set_state(InteractionState::Idle)
                    }
                    _ => {}
                }
                Response::Ignored
            }
            PointerEvent::Wheel { notch } => Response::redraw_if(viewport.zoom_by(notch)),
        }
    }

    fn pointer_down(
        &mut self,
        position: (f32, f32),
        buttons: PointerButtons,
        graph: &mut GraphModel,
        viewport: &mut Viewport,
    ) -> Response {
        let world = viewport.to_world(position);

        if buttons.middle {
            match self.state {
                InteractionState::Idle => {
                    self.set_state(InteractionState::Panning { pending: None });
                    return Response::Ignored;
                }
                InteractionState::ConnectingFrom(port) => {
                    self.set_state(InteractionState::Panning { pending: Some(port) });
                    return Response::Ignored;
                }
                _ => {}
            }
        }

        if buttons.right {
            let threshold = graph.config().hit_test.threshold;
            if let Some(connection) = graph.connection_at(world, threshold) {
                self.removed = graph.connection(connection).copied();
                graph.disconnect(connection);
                return Response::Redraw;
            }
            if self.cancel() {
                return Response::Redraw;
            }
            if !buttons.left {
                return Response::Ignored;
            }
        }

        if buttons.left {
            return self.left_down(world, graph);
        }

        Response::Ignored
    }

    fn left_down(&mut self, world: (f32, f32), graph: &mut GraphModel) -> Response {
        if let Some(port) = graph.port_at(world) {
            return match self.state {
                InteractionState::Idle => {
                    self.set_state(InteractionState::ConnectingFrom(port));
                    Response::Redraw
                }
                InteractionState::ConnectingFrom(start) => {
                    // Failure (same direction, duplicate, same port) just ends the gesture
                    graph.connect(start, port);
                    self.set_state(InteractionState::Idle);
                    Response::Redraw
                }
                _ => Response::Ignored,
            };
        }

        if self.state == InteractionState::Idle {
            if let Some(node) = graph.node_at(world) {
                self.set_state(InteractionState::DraggingNode(node));
                graph.bring_to_front(node);
                return Response::Redraw;
            }
        }

        Response::Ignored
    }

    fn pointer_move(
        &mut self,
        delta: (f32, f32),
        graph: &mut GraphModel,
        viewport: &mut Viewport,
    ) -> Response {
        match self.state {
            InteractionState::Idle => Response::Ignored,
            InteractionState::Panning { .. } => {
                log::trace!("pan by {delta:?}");
                viewport.pan(delta);
                Response::Redraw
            }
            InteractionState::DraggingNode(node) => {
                let zoom = viewport.zoom();
                let world_delta = (delta.0 / zoom, delta.1 / zoom);
                log::trace!("drag {node:?} by {world_delta:?}");
                Response::redraw_if(graph.move_node_by(node, world_delta))
            }
            InteractionState::ConnectingFrom(_) => Response::Redraw,
        }
    }

    fn set_state(&mut self, state: InteractionState) {
        log::debug!("interaction {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
