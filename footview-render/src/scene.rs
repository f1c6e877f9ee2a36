//! Scene graph of the foot viewer
//!
//! Nodes live in an arena keyed by [`NodeId`]; ids are never reused, so a
//! stale id simply stops resolving. Every node with a [`Drawable`] owns its
//! geometry handle. Materials are either owned by the single node drawing
//! them or retained by the view and shared between nodes; retained
//! materials are only released by [`SceneGraph::dispose_all`].

use crate::backend::{GeometryData, GeometryHandle, MaterialHandle, Primitive, RenderBackend};
use crate::materials::Material;
use footview_core::{
    Aabb, FitClassification, FitZone, FootSide, MeasurementType, Point3f, Transform3D, Vector3f,
};
use footview_overlays::billboard_rotation;
use std::collections::BTreeMap;

/// Identifier of a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Backend resources of a visible node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub primitive: Primitive,
    /// Bounds of the geometry in node coordinates
    pub bounds: Aabb,
}

/// What a node stands for, beyond its name
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeTag {
    #[default]
    None,
    Foot(FootSide),
    InfoPoint {
        side: FootSide,
        marker: String,
        measurement_type: MeasurementType,
    },
    FitZone {
        side: FootSide,
        zone: FitZone,
        classification: FitClassification,
    },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform3D,
    pub visible: bool,
    /// Lower orders are drawn first
    pub render_order: i32,
    pub drawable: Option<Drawable>,
    pub tag: NodeTag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform3D::identity(),
            visible: true,
            render_order: 0,
            drawable: None,
            tag: NodeTag::None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
struct MaterialEntry {
    material: Material,
    retained: bool,
}

/// A drawable node as seen by a backend
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub world: Transform3D,
    pub drawable: &'a Drawable,
    pub material: &'a Material,
    pub render_order: i32,
}

/// Arena of scene nodes plus the materials they draw with
#[derive(Debug)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    materials: BTreeMap<MaterialHandle, MaterialEntry>,
    next_id: usize,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, SceneNode::new("scene", None));
        Self {
            nodes,
            materials: BTreeMap::new(),
            next_id: 1,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Attach an empty transform node under `parent`
    pub fn add_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.attach(parent, SceneNode::new(name, Some(parent)))
    }

    fn attach(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            log::warn!("parent {:?} is gone, attaching {} to the root", parent, node.name);
            self.root
        };
        let mut node = node;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Upload `material` and keep its CPU copy for uniform updates.
    ///
    /// Retained materials survive the removal of every node using them.
    pub fn register_material<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        material: Material,
        retained: bool,
    ) -> MaterialHandle {
        let handle = backend.create_material(&material);
        self.materials.insert(handle, MaterialEntry { material, retained });
        handle
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle).map(|entry| &entry.material)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(&handle).map(|entry| &mut entry.material)
    }

    /// Add a node drawing `data` with a material of its own
    pub fn add_drawable<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        parent: NodeId,
        name: &str,
        data: &GeometryData,
        material: Material,
    ) -> NodeId {
        let material = self.register_material(backend, material, false);
        self.add_drawable_shared(backend, parent, name, data, material)
    }

    /// Add a node drawing `data` with an already registered material
    pub fn add_drawable_shared<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        parent: NodeId,
        name: &str,
        data: &GeometryData,
        material: MaterialHandle,
    ) -> NodeId {
        let geometry = backend.create_geometry(data);
        let mut node = SceneNode::new(name, Some(parent));
        node.drawable = Some(Drawable {
            geometry,
            material,
            primitive: data.primitive,
            bounds: data.bounding_box(),
        });
        self.attach(parent, node)
    }

    /// First direct child of `parent` called `name`
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|node| node.name == name))
    }

    /// Descendants of `id`, depth first, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Transform from `id` up to the root
    pub fn world_transform(&self, id: NodeId) -> Transform3D {
        let mut transform = Transform3D::identity();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(&id)) {
            transform = node.transform * transform;
            current = node.parent;
        }
        transform
    }

    /// Transform from `descendant` into the coordinates of `ancestor`
    fn relative_transform(&self, ancestor: NodeId, descendant: NodeId) -> Transform3D {
        let mut transform = Transform3D::identity();
        let mut current = Some(descendant);
        while let Some(id) = current {
            if id == ancestor {
                break;
            }
            let Some(node) = self.nodes.get(&id) else { break };
            transform = node.transform * transform;
            current = node.parent;
        }
        transform
    }

    /// Whether `id` and all of its ancestors are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(&id)) {
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        current.is_none()
    }

    /// Union of the bounds of all descendants called `name`, in the
    /// coordinates of `id`
    pub fn bounds_of_named(&self, id: NodeId, name: &str) -> Aabb {
        let mut bounds = Aabb::empty();
        for descendant in self.descendants(id) {
            let Some(node) = self.nodes.get(&descendant) else { continue };
            let Some(drawable) = node.drawable.as_ref().filter(|_| node.name == name) else {
                continue;
            };
            if drawable.bounds.is_empty() {
                continue;
            }
            let to_local = self.relative_transform(id, descendant);
            for corner in box_corners(&drawable.bounds) {
                bounds.expand_by_point(&to_local.transform_point(&corner));
            }
        }
        bounds
    }

    /// Visible drawables in draw order
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        let mut stack = vec![(self.root, Transform3D::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id).filter(|node| node.visible) else {
                continue;
            };
            let world = parent_world * node.transform;
            if let Some(drawable) = node.drawable.as_ref() {
                if let Some(material) = self.material(drawable.material) {
                    items.push(DrawItem {
                        node: id,
                        world,
                        drawable,
                        material,
                        render_order: node.render_order,
                    });
                }
            }
            stack.extend(node.children.iter().rev().map(|child| (*child, world)));
        }
        // stable, so equal orders keep tree order
        items.sort_by_key(|item| item.render_order);
        items
    }

    /// Remove every child of `id`, releasing what they own
    pub fn clear_children<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove_subtree(backend, child);
        }
    }

    /// Remove `id` and everything below it
    pub fn remove_subtree<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, id: NodeId) {
        if id == self.root {
            self.clear_children(backend, id);
            return;
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);

        if let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| *child != id);
            }
        }

        for node_id in doomed {
            let Some(node) = self.nodes.remove(&node_id) else { continue };
            if let Some(drawable) = node.drawable {
                backend.release_geometry(drawable.geometry);
                let owned = self
                    .materials
                    .get(&drawable.material)
                    .is_some_and(|entry| !entry.retained);
                if owned {
                    self.materials.remove(&drawable.material);
                    backend.release_material(drawable.material);
                }
            }
        }
    }

    /// Turn every child of `parent` to face `eye`, keeping its position
    pub fn billboard_children(&mut self, parent: NodeId, eye: &Point3f, up: &Vector3f) {
        let parent_world = self.world_transform(parent);
        let Some(parent_inverse) = parent_world.inverse() else {
            log::warn!("cannot billboard below a singular transform");
            return;
        };
        let children = self.children(parent).to_vec();
        for child in children {
            let Some(node) = self.nodes.get_mut(&child) else { continue };
            let local_position = Point3f::from(node.transform.translation_part());
            let world_position = parent_world.transform_point(&local_position);
            let rotation = billboard_rotation(&world_position, eye, up);
            let mut local = parent_inverse * Transform3D::rotation(rotation);
            local.set_translation(&local_position.coords);
            node.transform = local;
        }
    }

    /// Release every node and material, leaving an empty root
    pub fn dispose_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for node in self.nodes.values() {
            if let Some(drawable) = node.drawable.as_ref() {
                backend.release_geometry(drawable.geometry);
            }
        }
        for handle in self.materials.keys() {
            backend.release_material(*handle);
        }
        self.materials.clear();
        self.nodes.clear();
        self.nodes.insert(self.root, SceneNode::new("scene", None));
    }
}

fn box_corners(bounds: &Aabb) -> [Point3f; 8] {
    let (a, b) = (bounds.min, bounds.max);
    [
        Point3f::new(a.x, a.y, a.z),
        Point3f::new(b.x, a.y, a.z),
        Point3f::new(a.x, b.y, a.z),
        Point3f::new(b.x, b.y, a.z),
        Point3f::new(a.x, a.y, b.z),
        Point3f::new(b.x, a.y, b.z),
        Point3f::new(a.x, b.y, b.z),
        Point3f::new(b.x, b.y, b.z),
    ]
}
