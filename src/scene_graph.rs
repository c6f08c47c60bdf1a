use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

pub type NodeId = usize;
pub type MeshId = usize;
pub type MaterialId = usize;
pub type ImageId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

// SCENE GRAPH NODES
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub local: Transform,
    pub world: Mat4,
    pub mesh: Option<MeshId>,
}

impl Node {
    pub fn world_translation(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

#[derive(Debug, Clone)]
pub struct Primitive {
    pub topology: Topology,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    // the set the base color texture samples with
    pub tex_coords: Option<Vec<Vec2>>,
    pub indices: Option<Vec<u32>>,
    pub material: Option<MaterialId>,
}

impl Primitive {
    pub fn triangles(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            topology: Topology::Triangles,
            positions,
            normals: Some(normals),
            tex_coords: None,
            indices: Some(indices),
            material: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: Vec4,
    pub emissive: Vec4,
    pub base_color_texture: Option<ImageId>,
}

impl Material {
    /// Colours used for primitives without a material.
    pub const FALLBACK: Material = Material {
        base_color: Vec4::ONE,
        emissive: Vec4::ZERO,
        base_color_texture: None,
    };
}

#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    /// Encoded bytes exactly as stored in the source file.
    pub bytes: Vec<u8>,
}

/// A fully loaded scene. Nodes keep the source document order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub images: Vec<Image>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node below `parent` (which must already exist) and bakes its world matrix.
    pub fn add_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        local: Transform,
        mesh: Option<MeshId>,
    ) -> NodeId {
        let parent_world = parent
            .map(|p| self.nodes[p].world)
            .unwrap_or(Mat4::IDENTITY);
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            local,
            world: parent_world * local.matrix(),
            mesh,
        });
        self.nodes.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_image(&mut self, image: Image) -> ImageId {
        self.images.push(image);
        self.images.len() - 1
    }

    pub fn node_mesh(&self, node: &Node) -> Option<&Mesh> {
        node.mesh.and_then(|m| self.meshes.get(m))
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent.and_then(|p| self.nodes.get(p))
    }

    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(id))
    }

    pub fn material(&self, primitive: &Primitive) -> &Material {
        primitive
            .material
            .and_then(|m| self.materials.get(m))
            .unwrap_or(&Material::FALLBACK)
    }

    pub fn base_color_image(&self, primitive: &Primitive) -> Option<&Image> {
        self.material(primitive)
            .base_color_texture
            .and_then(|i| self.images.get(i))
    }
}
