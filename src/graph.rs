//! Nodes, ports and connections of the canvas.
//!
//! Nodes and ports live in append-only arenas indexed by [`NodeId`] and [`PortId`].
//! Removing one leaves a tombstone, so a stale id resolves to "absent" instead of
//! pointing at whatever was allocated next. Geometry is never stored: node sizes come
//! from the image counts and port boxes from the owning node, both computed on demand.

use crate::config::{CanvasConfig, LayoutConfig};
use crate::error::ConnectError;
use crate::hit_test::{
    find_link_at, find_node_at, find_pin_at, Rect, SimpleLinkGeometry, SimpleNodeGeometry,
    SimplePinGeometry,
};
use crate::image::{ImageProvider, ImageResolver, ImageSet};
use crate::propagation::{PropagationEngine, PropagationOutcome};
use slint::Color;
use strum::{Display, EnumIter};
use typed_index_collections::TiVec;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

arena_id!(
    /// Handle of a node in the [`GraphModel`] arena.
    NodeId
);
arena_id!(
    /// Handle of a port in the [`GraphModel`] arena.
    PortId
);
arena_id!(
    /// Identity of a connection. Never reused.
    ConnectionId
);

/// The closed set of processing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum NodeKind {
    Origin,
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
}

impl NodeKind {
    /// Header colour of nodes of this kind
    pub fn color(self) -> Color {
        match self {
            NodeKind::Origin => Color::from_rgb_u8(70, 130, 180),
            NodeKind::Stage1 => Color::from_rgb_u8(220, 20, 60),
            NodeKind::Stage2 => Color::from_rgb_u8(255, 140, 0),
            NodeKind::Stage3 => Color::from_rgb_u8(50, 205, 50),
            NodeKind::Stage4 => Color::from_rgb_u8(138, 43, 226),
            NodeKind::Stage5 => Color::from_rgb_u8(255, 20, 147),
        }
    }

    pub fn is_origin(self) -> bool {
        self == NodeKind::Origin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PortDirection {
    Input,
    Output,
}

/// A connection point. Belongs to one node for its whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: PortId,
    direction: PortDirection,
    name: String,
    node: NodeId,
}

impl Port {
    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// A processing stage on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    title: String,
    /// Top-left corner, world space
    position: (f32, f32),
    inputs: Vec<PortId>,
    outputs: Vec<PortId>,
    pub(crate) input_images: ImageSet,
    pub(crate) output_images: ImageSet,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, title: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            position,
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_images: ImageSet::new(),
            output_images: ImageSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn input_ports(&self) -> &[PortId] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[PortId] {
        &self.outputs
    }

    pub fn input_images(&self) -> &ImageSet {
        &self.input_images
    }

    pub fn output_images(&self) -> &ImageSet {
        &self.output_images
    }

    /// Wide enough for up to one row of images on the busier side
    pub fn width(&self, layout: &LayoutConfig) -> f32 {
        let columns = self
            .input_images
            .len()
            .max(self.output_images.len())
            .min(layout.images_per_row);
        layout
            .min_node_width
            .max(layout.horizontal_padding + columns as f32 * layout.column_width)
    }

    /// Base height plus one row per started group of images and a label per non-empty side
    pub fn height(&self, layout: &LayoutConfig) -> f32 {
        let side = |count: usize| {
            if count == 0 {
                0.0
            } else {
                let rows = count.div_ceil(layout.images_per_row);
                rows as f32 * layout.row_height + layout.label_allowance
            }
        };
        layout.base_node_height + side(self.input_images.len()) + side(self.output_images.len())
    }

    pub fn rect(&self, layout: &LayoutConfig) -> Rect {
        Rect::new(self.position.0, self.position.1, self.width(layout), self.height(layout))
    }
}

/// A directed edge, always from an output port to an input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub output: PortId,
    pub input: PortId,
}

impl Connection {
    /// Whether this joins `a` and `b`, in either order
    pub fn joins(&self, a: PortId, b: PortId) -> bool {
        (self.output == a && self.input == b) || (self.output == b && self.input == a)
    }

    pub fn touches(&self, port: PortId) -> bool {
        self.output == port || self.input == port
    }
}

/// Owner of all nodes, ports and connections.
pub struct GraphModel {
    nodes: TiVec<NodeId, Option<Node>>,
    ports: TiVec<PortId, Option<Port>>,
    connections: Vec<Connection>,
    next_connection: usize,
    /// Bottom first; the last entry is drawn on top and wins hit tests.
    draw_order: Vec<NodeId>,
    engine: PropagationEngine,
    resolver: ImageResolver,
    config: CanvasConfig,
}

impl GraphModel {
    /// An empty graph. Invalid config values fall back to their defaults.
    pub fn new(provider: Box<dyn ImageProvider>, config: CanvasConfig) -> Self {
        let config = config.sanitized();
        let resolver = ImageResolver::new(provider, &config.images);
        Self {
            nodes: TiVec::new(),
            ports: TiVec::new(),
            connections: Vec::new(),
            next_connection: 0,
            draw_order: Vec::new(),
            engine: PropagationEngine::default(),
            resolver,
            config,
        }
    }

    /// The six-stage image pipeline, unconnected
    pub fn standard_pipeline(provider: Box<dyn ImageProvider>, config: CanvasConfig) -> Self {
        let mut graph = Self::new(provider, config);

        let origin = graph.add_node(NodeKind::Origin, "Original", (50.0, 30.0));
        graph.add_port(origin, PortDirection::Output, "Output");
        graph.restore_origin_default(origin);

        let stages = [
            (NodeKind::Stage1, (300.0, 30.0)),
            (NodeKind::Stage2, (600.0, 30.0)),
            (NodeKind::Stage3, (300.0, 330.0)),
            (NodeKind::Stage4, (600.0, 330.0)),
            (NodeKind::Stage5, (900.0, 330.0)),
        ];
        for (kind, position) in stages {
            let node = graph.add_node(kind, kind.to_string(), position);
            graph.add_port(node, PortDirection::Input, "Input");
            graph.add_port(node, PortDirection::Output, "Output");
        }

        graph
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn engine(&self) -> &PropagationEngine {
        &self.engine
    }

    // === Structure ===

    pub fn add_node(&mut self, kind: NodeKind, title: impl Into<String>, position: (f32, f32)) -> NodeId {
        let id = self.nodes.next_key();
        self.nodes.push(Some(Node::new(id, kind, title, position)));
        self.draw_order.push(id);
        id
    }

    /// Attach a new port to `node`. `None` if the node does not exist.
    pub fn add_port(
        &mut self,
        node: NodeId,
        direction: PortDirection,
        name: impl Into<String>,
    ) -> Option<PortId> {
        self.node(node)?;
        let id = self.ports.next_key();
        self.ports.push(Some(Port { id, direction, name: name.into(), node }));
        let owner = self.node_mut(node)?;
        match direction {
            PortDirection::Input => owner.inputs.push(id),
            PortDirection::Output => owner.outputs.push(id),
        }
        Some(id)
    }

    /// Remove a node, its ports and every connection touching them
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(removed) = self.node(node) else {
            return false;
        };
        let ports: Vec<PortId> = removed.inputs.iter().chain(&removed.outputs).copied().collect();

        let touching: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|connection| ports.iter().any(|port| connection.touches(*port)))
            .map(|connection| connection.id)
            .collect();
        for connection in touching {
            self.disconnect(connection);
        }

        for port in ports {
            if let Some(slot) = self.ports.get_mut(port) {
                *slot = None;
            }
        }
        if let Some(slot) = self.nodes.get_mut(node) {
            *slot = None;
        }
        self.draw_order.retain(|id| *id != node);
        log::debug!("removed node {node:?}");
        true
    }

    // === Queries ===

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id).and_then(Option::as_ref)
    }

    /// The node a port belongs to
    pub fn port_owner(&self, port: PortId) -> Option<&Node> {
        self.port(port).and_then(|port| self.node(port.node))
    }

    /// First live node of `kind`
    pub fn node_of_kind(&self, kind: NodeKind) -> Option<NodeId> {
        self.nodes
            .iter()
            .flatten()
            .find(|node| node.kind == kind)
            .map(|node| node.id)
    }

    /// Node ids, bottom first
    pub fn draw_order(&self) -> &[NodeId] {
        &self.draw_order
    }

    /// Nodes, bottom first
    pub fn nodes_in_draw_order(&self) -> impl Iterator<Item = &Node> + '_ {
        self.draw_order.iter().filter_map(|id| self.node(*id))
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    /// Whether any output port of `node` is connected
    pub fn has_outgoing_connection(&self, node: NodeId) -> bool {
        self.connections.iter().any(|connection| {
            self.port(connection.output).map(Port::node) == Some(node)
        })
    }

    // === Geometry ===

    pub fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.node(node).map(|node| node.rect(&self.config.layout))
    }

    /// Port centre in world space, derived from the owner's current rectangle
    pub fn port_center(&self, port: PortId) -> Option<(f32, f32)> {
        let port = self.port(port)?;
        let rect = self.node_rect(port.node)?;
        let layout = &self.config.layout;
        let y = rect.y + rect.height - layout.port_bottom_inset;
        let x = match port.direction {
            PortDirection::Input => rect.x - layout.port_edge_offset,
            PortDirection::Output => rect.x + rect.width - layout.port_edge_offset,
        };
        Some((x, y))
    }

    /// Square hit box of a port, world space
    pub fn port_bounds(&self, port: PortId) -> Option<Rect> {
        self.port_center(port)
            .map(|center| Rect::centered(center, self.config.layout.port_size))
    }

    /// (output port centre, input port centre)
    pub fn connection_endpoints(&self, connection: ConnectionId) -> Option<((f32, f32), (f32, f32))> {
        let connection = self.connection(connection)?;
        Some((self.port_center(connection.output)?, self.port_center(connection.input)?))
    }

    // === Hit testing (world space) ===

    /// Topmost node containing the point
    pub fn node_at(&self, point: (f32, f32)) -> Option<NodeId> {
        let layout = &self.config.layout;
        let nodes: Vec<_> = self
            .nodes_in_draw_order()
            .map(|node| SimpleNodeGeometry { id: node.id, rect: node.rect(layout) })
            .collect();
        find_node_at(point, nodes)
    }

    /// First port, in draw order with inputs before outputs, whose box contains the point
    pub fn port_at(&self, point: (f32, f32)) -> Option<PortId> {
        let pins = self
            .nodes_in_draw_order()
            .flat_map(|node| node.inputs.iter().chain(&node.outputs))
            .filter_map(|port| {
                self.port_bounds(*port)
                    .map(|rect| SimplePinGeometry { id: *port, rect })
            });
        find_pin_at(point, pins)
    }

    /// First connection whose sampled curve passes within `tolerance` of the point
    pub fn connection_at(&self, point: (f32, f32), tolerance: f32) -> Option<ConnectionId> {
        let links = self.connections.iter().filter_map(|connection| {
            let (start, end) = self.connection_endpoints(connection.id)?;
            Some(SimpleLinkGeometry { id: connection.id, start, end })
        });
        find_link_at(point, links, self.config.hit_test.segments, tolerance)
    }

    // === Mutation ===

    pub fn move_node_by(&mut self, node: NodeId, delta: (f32, f32)) -> bool {
        match self.node_mut(node) {
            Some(node) => {
                node.position.0 += delta.0;
                node.position.1 += delta.1;
                true
            }
            None => false,
        }
    }

    /// Move `node` to the end of the draw order
    pub fn bring_to_front(&mut self, node: NodeId) {
        if let Some(index) = self.draw_order.iter().position(|id| *id == node) {
            let id = self.draw_order.remove(index);
            self.draw_order.push(id);
        }
    }

    /// Connect two ports, in either order, and run propagation for the new edge
    pub fn try_connect(&mut self, a: PortId, b: PortId) -> Result<ConnectionId, ConnectError> {
        let port_a = self.port(a).ok_or(ConnectError::PortNotFound(a))?;
        let port_b = self.port(b).ok_or(ConnectError::PortNotFound(b))?;
        if port_a.direction == port_b.direction {
            return Err(ConnectError::SameDirection);
        }
        let (output, input) = match port_a.direction {
            PortDirection::Output => (port_a, port_b),
            PortDirection::Input => (port_b, port_a),
        };
        let (source, destination) = (output.node, input.node);
        let (output, input) = (output.id, input.id);

        if self.connections.iter().any(|connection| connection.joins(output, input)) {
            return Err(ConnectError::Duplicate(output, input));
        }

        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections.push(Connection { id, output, input });
        log::debug!("connected {output:?} -> {input:?} as {id:?}");

        let outcome = self.propagate(source, destination);
        log::debug!("propagation for {id:?}: {outcome:?}");
        Ok(id)
    }

    /// [`try_connect`](Self::try_connect) without the reason
    pub fn connect(&mut self, a: PortId, b: PortId) -> bool {
        match self.try_connect(a, b) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("connect rejected: {err}");
                false
            }
        }
    }

    fn propagate(&mut self, source: NodeId, destination: NodeId) -> PropagationOutcome {
        // Take the destination out of its slot so the source can be borrowed alongside.
        // A node wired to itself has no source left, which matches the table: there are
        // no same-kind rules.
        let Some(mut target) = self.nodes.get_mut(destination).and_then(Option::take) else {
            return PropagationOutcome::NoRule;
        };
        let outcome = match self.node(source) {
            Some(source) => self.engine.on_connect(source, &mut target, &self.resolver),
            None => PropagationOutcome::NoRule,
        };
        self.nodes[destination] = Some(target);
        outcome
    }

    /// Remove a connection and clear what its downstream node received
    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        let Some(index) = self.connections.iter().position(|c| c.id == connection) else {
            return false;
        };
        let removed = self.connections.remove(index);
        log::debug!("disconnected {:?} -> {:?}", removed.output, removed.input);

        let Some(downstream) = self.port(removed.input).map(Port::node) else {
            return true;
        };
        let has_outgoing = self.has_outgoing_connection(downstream);
        if let Some(node) = self.nodes.get_mut(downstream).and_then(Option::as_mut) {
            self.engine.on_disconnect(node, has_outgoing);
        }
        true
    }

    /// Remove every connection and empty every non-Origin node
    pub fn clear_all_connections(&mut self) {
        self.connections.clear();
        for node in self.nodes.iter_mut().flatten() {
            if !node.kind.is_origin() {
                node.input_images.clear();
                node.output_images.clear();
            }
        }
        log::debug!("cleared all connections");
    }

    /// [`clear_all_connections`](Self::clear_all_connections), then put the Origin back
    /// to its single default output
    pub fn reset_all(&mut self) {
        self.clear_all_connections();
        let origins: Vec<NodeId> = self
            .nodes
            .iter()
            .flatten()
            .filter(|node| node.kind.is_origin())
            .map(|node| node.id)
            .collect();
        for origin in origins {
            self.restore_origin_default(origin);
        }
        log::debug!("reset all nodes");
    }

    /// Replace the Origin's outputs with `identifiers`, resolved now.
    ///
    /// Nodes already wired to the Origin keep what they received when they were
    /// connected. Returns false when there is no Origin node.
    pub fn load_origin_images<I, S>(&mut self, identifiers: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(origin) = self.node_of_kind(NodeKind::Origin) else {
            return false;
        };
        let images = self.resolver.resolve_all(identifiers);
        log::debug!("loaded {} origin images", images.len());
        if let Some(node) = self.node_mut(origin) {
            node.output_images = images;
        }
        true
    }

    fn restore_origin_default(&mut self, origin: NodeId) {
        let images = self.resolver.resolve_all([self.config.images.origin_default.as_str()]);
        if let Some(node) = self.node_mut(origin) {
            node.input_images.clear();
            node.output_images = images;
        }
    }
}
