//! glTF 2.0 export of deck scenes.
//!
//! Each non-empty scene node becomes one glTF mesh with POSITION, COLOR_0
//! and u32 indices. Nodes with any translucent vertex color get an
//! alpha-blended material. All nodes hang under a root node that rotates the
//! Z-up model into glTF's Y-up frame.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use base64::Engine;
use gltf::json;
use json::accessor::{ComponentType, Type};
use json::validation::{Checked::Valid, USize64};
use slabdeck_mesh::{Scene, TriangleMesh, WHITE};
use tracing::{debug, info};

use crate::{DeckError, Result};

/// -90 degrees about X: model Z becomes glTF Y.
const Z_UP_TO_Y_UP: [f32; 4] = [
    -std::f32::consts::FRAC_1_SQRT_2,
    0.0,
    0.0,
    std::f32::consts::FRAC_1_SQRT_2,
];

const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn is_translucent(mesh: &TriangleMesh) -> bool {
    mesh.has_colors() && mesh.colors.chunks_exact(4).any(|c| c[3] < 255)
}

fn position_bounds(mesh: &TriangleMesh) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for v in mesh.vertices.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(v[i]);
            max[i] = max[i].max(v[i]);
        }
    }
    (min, max)
}

/// Collects the binary buffer and the JSON document side by side.
struct DocumentBuilder {
    root: json::Root,
    bin: Vec<u8>,
    opaque: Option<json::Index<json::Material>>,
    blended: Option<json::Index<json::Material>>,
}

impl DocumentBuilder {
    fn new() -> Self {
        let mut root = json::Root::default();
        root.asset.generator = Some(format!("slabdeck {}", env!("CARGO_PKG_VERSION")));
        Self {
            root,
            bin: Vec::new(),
            opaque: None,
            blended: None,
        }
    }

    fn push_view(
        &mut self,
        bytes: &[u8],
        target: json::buffer::Target,
    ) -> json::Index<json::buffer::View> {
        self.bin.resize(padded_len(self.bin.len()), 0);
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        self.root.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: USize64::from(bytes.len()),
            byte_offset: Some(USize64::from(offset)),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(target)),
        })
    }

    fn push_accessor(
        &mut self,
        view: json::Index<json::buffer::View>,
        count: usize,
        component: ComponentType,
        type_: Type,
        normalized: bool,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        self.root.push(json::Accessor {
            buffer_view: Some(view),
            byte_offset: None,
            count: USize64::from(count),
            component_type: Valid(json::accessor::GenericComponentType(component)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min: bounds.map(|(min, _)| json::Value::from(min.to_vec())),
            max: bounds.map(|(_, max)| json::Value::from(max.to_vec())),
            name: None,
            normalized,
            sparse: None,
        })
    }

    fn material(&mut self, translucent: bool) -> json::Index<json::Material> {
        let cached = if translucent { self.blended } else { self.opaque };
        if let Some(index) = cached {
            return index;
        }
        let (name, alpha_mode) = if translucent {
            ("translucent", json::material::AlphaMode::Blend)
        } else {
            ("opaque", json::material::AlphaMode::Opaque)
        };
        let index = self.root.push(json::Material {
            alpha_mode: Valid(alpha_mode),
            double_sided: true,
            name: Some(name.to_string()),
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                metallic_factor: json::material::StrengthFactor(0.0),
                roughness_factor: json::material::StrengthFactor(0.9),
                ..Default::default()
            },
            ..Default::default()
        });
        if translucent {
            self.blended = Some(index);
        } else {
            self.opaque = Some(index);
        }
        index
    }

    fn push_mesh(&mut self, name: &str, mesh: &TriangleMesh) -> json::Index<json::Node> {
        let positions: Vec<u8> = mesh.vertices.iter().flat_map(|v| v.to_le_bytes()).collect();
        let colors: Vec<u8> = if mesh.has_colors() {
            mesh.colors.clone()
        } else {
            WHITE.repeat(mesh.num_vertices())
        };
        let indices: Vec<u8> = mesh.indices.iter().flat_map(|i| i.to_le_bytes()).collect();

        let view = self.push_view(&positions, json::buffer::Target::ArrayBuffer);
        let positions = self.push_accessor(
            view,
            mesh.num_vertices(),
            ComponentType::F32,
            Type::Vec3,
            false,
            Some(position_bounds(mesh)),
        );
        let view = self.push_view(&colors, json::buffer::Target::ArrayBuffer);
        let colors = self.push_accessor(
            view,
            mesh.num_vertices(),
            ComponentType::U8,
            Type::Vec4,
            true,
            None,
        );
        let view = self.push_view(&indices, json::buffer::Target::ElementArrayBuffer);
        let indices = self.push_accessor(
            view,
            mesh.indices.len(),
            ComponentType::U32,
            Type::Scalar,
            false,
            None,
        );

        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(json::mesh::Semantic::Positions), positions);
        attributes.insert(Valid(json::mesh::Semantic::Colors(0)), colors);

        let material = self.material(is_translucent(mesh));
        let mesh_index = self.root.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives: vec![json::mesh::Primitive {
                attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(indices),
                material: Some(material),
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            }],
            weights: None,
        });
        self.root.push(json::Node {
            mesh: Some(mesh_index),
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    /// Finish the document. `uri` is set on the single buffer.
    fn finish(
        mut self,
        scene: &Scene,
        children: Vec<json::Index<json::Node>>,
        uri: Option<String>,
    ) -> (json::Root, Vec<u8>) {
        self.root.push(json::Buffer {
            byte_length: USize64::from(self.bin.len()),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri,
        });
        let root_node = self.root.push(json::Node {
            children: Some(children),
            name: Some(scene.name.clone()),
            rotation: Some(json::scene::UnitQuaternion(Z_UP_TO_Y_UP)),
            ..Default::default()
        });
        let scene_index = self.root.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(scene.name.clone()),
            nodes: vec![root_node],
        });
        self.root.scene = Some(scene_index);
        (self.root, self.bin)
    }
}

fn build_document(scene: &Scene) -> Result<(DocumentBuilder, Vec<json::Index<json::Node>>)> {
    let mut builder = DocumentBuilder::new();
    let mut children = Vec::new();
    for node in scene.nodes.iter().filter(|n| !n.mesh.is_empty()) {
        debug!(
            node = %node.name,
            triangles = node.mesh.num_triangles(),
            "adding glTF mesh"
        );
        children.push(builder.push_mesh(&node.name, &node.mesh));
    }
    if children.is_empty() {
        return Err(DeckError::Export(format!(
            "scene '{}' has no geometry",
            scene.name
        )));
    }
    Ok((builder, children))
}

/// Encode a scene as binary glTF (GLB).
pub fn scene_to_glb(scene: &Scene) -> Result<Vec<u8>> {
    let (builder, children) = build_document(scene)?;
    let (root, bin) = builder.finish(scene, children, None);
    let json = serde_json::to_vec(&root)?;

    let length = GLB_HEADER_LEN
        + GLB_CHUNK_HEADER_LEN
        + padded_len(json.len())
        + GLB_CHUNK_HEADER_LEN
        + padded_len(bin.len());
    let length = u32::try_from(length)
        .map_err(|_| DeckError::Export(format!("GLB size {length} exceeds the format limit")))?;

    let glb = gltf::binary::Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length,
        },
        json: Cow::Owned(json),
        bin: Some(Cow::Owned(bin)),
    };
    glb.to_vec().map_err(|e| DeckError::Export(e.to_string()))
}

/// Encode a scene as JSON glTF with the buffer embedded as a data URI.
pub fn scene_to_gltf(scene: &Scene) -> Result<String> {
    let (builder, children) = build_document(scene)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&builder.bin);
    let uri = format!("data:application/octet-stream;base64,{encoded}");
    let (root, _) = builder.finish(scene, children, Some(uri));
    Ok(serde_json::to_string_pretty(&root)?)
}

/// Write a scene to a `.glb` file.
pub fn export_scene_glb(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let bytes = scene_to_glb(scene)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(path = %path.as_ref().display(), bytes = bytes.len(), "wrote GLB");
    Ok(())
}

/// Write a scene to a self-contained `.gltf` file.
pub fn export_scene_gltf(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let text = scene_to_gltf(scene)?;
    std::fs::write(path.as_ref(), &text)?;
    info!(path = %path.as_ref().display(), bytes = text.len(), "wrote glTF");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slabdeck_mesh::{axis_box, NodeRole};
    use slabdeck_math::{Point3, Vec3};
    use slabdeck_model::{build_solid_with, default_segments, SectionLocations, SolidOptions};

    fn deck_scene() -> Scene {
        let options = SolidOptions {
            section_planes: Some(SectionLocations::default()),
            ..SolidOptions::default()
        };
        build_solid_with(&default_segments(), &options).unwrap().scene
    }

    #[test]
    fn test_glb_parses_back() {
        let scene = deck_scene();
        let bytes = scene_to_glb(&scene).unwrap();
        assert_eq!(&bytes[..4], b"glTF");
        assert_eq!(bytes.len() % 4, 0);
        let declared = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        assert_eq!(declared, bytes.len());

        let gltf = gltf::Gltf::from_slice(&bytes).unwrap();
        assert_eq!(gltf.meshes().count(), scene.len());
        let deck = gltf
            .meshes()
            .find(|m| m.name() == Some("deck"))
            .unwrap();
        let primitive = deck.primitives().next().unwrap();
        assert!(primitive.get(&gltf::Semantic::Colors(0)).is_some());
        assert_eq!(primitive.indices().unwrap().count(), 36 * 3);
        assert_eq!(
            primitive.material().alpha_mode(),
            gltf::material::AlphaMode::Opaque
        );
    }

    #[test]
    fn test_translucent_planes_blend() {
        let bytes = scene_to_glb(&deck_scene()).unwrap();
        let gltf = gltf::Gltf::from_slice(&bytes).unwrap();
        let plane = gltf
            .meshes()
            .find(|m| m.name() == Some("cross_plane"))
            .unwrap();
        let material = plane.primitives().next().unwrap().material();
        assert_eq!(material.alpha_mode(), gltf::material::AlphaMode::Blend);
        // opaque and blended materials are shared
        assert_eq!(gltf.materials().count(), 2);
    }

    #[test]
    fn test_gltf_embeds_buffer() {
        let text = scene_to_gltf(&deck_scene()).unwrap();
        assert!(text.contains("data:application/octet-stream;base64,"));
        let gltf = gltf::Gltf::from_slice(text.as_bytes()).unwrap();
        assert_eq!(gltf.buffers().count(), 1);
        let root = gltf.default_scene().unwrap().nodes().next().unwrap();
        assert_eq!(root.name(), Some("slab_deck"));
    }

    #[test]
    fn test_uncolored_mesh_defaults_to_white() {
        let mut scene = Scene::new("box");
        let mesh = axis_box(Vec3::new(1.0, 1.0, 1.0), Point3::origin());
        assert!(!mesh.has_colors());
        scene.add("box", NodeRole::Solid, mesh);
        assert!(scene_to_glb(&scene).is_ok());
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let scene = Scene::new("empty");
        assert!(matches!(scene_to_glb(&scene), Err(DeckError::Export(_))));
    }
}
