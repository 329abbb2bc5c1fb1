use crate::scene::item::{MaterialHandle, MeshHandle};
use crate::scene::material::Material;
use crate::scene::mesh::MeshGeometry;
use crate::texture::TextureTable;

/// Explicit ownership container for every shared scene asset.
///
/// Replaces name-keyed global registries with arena `Vec`s addressed by
/// stable handles; name lookup survives only as a construction-time
/// convenience.  Owned by the application and passed by reference into the
/// update and draw passes.
pub struct SceneAssets {
    geometries: Vec<MeshGeometry>,
    materials: Vec<Material>,
    pub textures: TextureTable,
}

impl SceneAssets {
    pub fn new(textures: TextureTable) -> Self {
        Self {
            geometries: Vec::new(),
            materials: Vec::new(),
            textures,
        }
    }

    pub fn add_geometry(&mut self, geometry: MeshGeometry) -> MeshHandle {
        self.geometries.push(geometry);
        MeshHandle(self.geometries.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        assert_eq!(
            material.cb_index,
            self.materials.len(),
            "material {:?} slot index must match registration order",
            material.name
        );
        assert!(
            material.texture_index < self.textures.len(),
            "material {:?} references unregistered texture",
            material.name
        );
        self.materials.push(material);
        MaterialHandle(self.materials.len() - 1)
    }

    pub fn geometry(&self, handle: MeshHandle) -> &MeshGeometry {
        &self.geometries[handle.0]
    }

    pub fn geometry_mut(&mut self, handle: MeshHandle) -> &mut MeshGeometry {
        &mut self.geometries[handle.0]
    }

    pub fn material(&self, handle: MaterialHandle) -> &Material {
        &self.materials[handle.0]
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> &mut Material {
        &mut self.materials[handle.0]
    }

    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Construction-time name lookup; a missing name is a scene bug.
    pub fn material_handle(&self, name: &str) -> MaterialHandle {
        match self.materials.iter().position(|m| m.name == name) {
            Some(i) => MaterialHandle(i),
            None => panic!("no material named {name:?}"),
        }
    }
}
