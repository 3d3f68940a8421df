use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TracerError};
use crate::types::SphereData;

/// Surface response understood by the kernel; the discriminant is the wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Diffuse = 0,
    /// `param1` is the roughness of the reflection lobe
    Specular = 1,
    /// `param1` is the index of refraction
    Refractive = 2,
}

impl Material {
    pub fn tag(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub radius: f32,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub param1: f32,
    #[serde(default)]
    pub param2: f32,
    pub position: Vec3,
    #[serde(default)]
    pub color: Vec3,
    #[serde(default)]
    pub emission: Vec3,
}

impl Sphere {
    pub fn diffuse(radius: f32, position: Vec3, color: Vec3) -> Self {
        Self {
            radius,
            material: Material::Diffuse,
            param1: 0.0,
            param2: 0.0,
            position,
            color,
            emission: Vec3::ZERO,
        }
    }

    pub fn light(radius: f32, position: Vec3, emission: Vec3) -> Self {
        Self {
            emission,
            color: Vec3::ZERO,
            ..Self::diffuse(radius, position, Vec3::ZERO)
        }
    }

    pub fn to_gpu(&self) -> SphereData {
        SphereData {
            radius: self.radius,
            material: self.material.tag(),
            param1: self.param1,
            param2: self.param2,
            position: self.position.to_array(),
            color: self.color.to_array(),
            emission: self.emission.to_array(),
            ..Default::default()
        }
    }
}

/// Fixed list of spheres rendered by the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Default for Scene {
    fn default() -> Self {
        create_default_scene()
    }
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Result<Self> {
        let scene = Self { spheres };
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TracerError::SceneIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Mutable access keeps the sphere count fixed.
    pub fn spheres_mut(&mut self) -> &mut [Sphere] {
        &mut self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn to_gpu(&self) -> Vec<SphereData> {
        self.spheres.iter().map(Sphere::to_gpu).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.spheres.is_empty() {
            return Err(TracerError::InvalidScene("scene has no spheres".to_string()));
        }
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(TracerError::InvalidScene(format!(
                    "sphere {index} has radius {}",
                    sphere.radius
                )));
            }
            if !sphere.position.is_finite() {
                return Err(TracerError::InvalidScene(format!(
                    "sphere {index} has a non-finite position"
                )));
            }
        }
        Ok(())
    }
}

/// Floor, three spheres and an overhead light
pub fn create_default_scene() -> Scene {
    Scene {
        spheres: vec![
            Sphere::diffuse(200.0, Vec3::new(0.0, -200.4, 0.0), Vec3::ONE),
            Sphere::diffuse(0.16, Vec3::new(-0.25, -0.24, -0.1), Vec3::new(0.2, 0.5, 0.9)),
            Sphere::diffuse(0.14, Vec3::new(0.25, -0.24, 0.1), Vec3::new(0.9, 0.8, 0.7)),
            Sphere::diffuse(0.18, Vec3::new(0.3, 0.15, 0.1), Vec3::new(0.5, 0.7, 0.2)),
            Sphere::light(0.5, Vec3::new(0.0, 1.35, 0.0), Vec3::splat(15.0)),
        ],
    }
}
