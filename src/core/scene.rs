// Copyright @yucwang 2026

use crate::core::interaction::{HitRecord, SurfaceIntersection};
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::core::texture::Texture;
use crate::emitters::background::Background;
use crate::emitters::quad::QuadLight;
use crate::materials::disney::DisneyMaterial;
use crate::materials::params::MaterialParams;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

use log::trace;
use std::sync::Arc;

/// What the integrator needs from the scene. Implementations are shared
/// read-only between render threads.
pub trait SceneQuery: Sync {
    /// Nearest surface hit inside the ray segment.
    fn trace(&self, ray: &Ray3f) -> Option<HitRecord>;
    /// Whether anything blocks the ray segment.
    fn occluded(&self, ray: &Ray3f) -> bool;
    /// The material at a hit, with textures already applied.
    fn material(&self, hit: &HitRecord) -> DisneyMaterial;
    fn lights(&self) -> &[QuadLight];
    /// Radiance carried by a ray that leaves the scene.
    fn background(&self, dir: &Vector3f) -> RGBSpectrum;
}

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material_id: usize,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material_id: usize) -> Self {
        Self { shape, material_id, name: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }
}

/// Reference scene: a flat list of objects intersected one by one.
/// Quad lights are kept apart from the geometry; they neither occlude nor
/// show up in `trace`.
pub struct Scene {
    objects: Vec<SceneObject>,
    materials: Vec<MaterialParams>,
    textures: Vec<Box<dyn Texture>>,
    lights: Vec<QuadLight>,
    sensors: Vec<Box<dyn Sensor>>,
    background: Background,
    base_dir: std::path::PathBuf,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            lights: Vec::new(),
            sensors: Vec::new(),
            background: Background::default(),
            base_dir: std::path::PathBuf::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    /// Returns the id objects use to refer to the material.
    pub fn add_material(&mut self, params: MaterialParams) -> usize {
        self.materials.push(params);
        self.materials.len() - 1
    }

    pub fn materials(&self) -> &Vec<MaterialParams> {
        &self.materials
    }

    pub fn add_texture(&mut self, texture: Box<dyn Texture>) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn textures(&self) -> &Vec<Box<dyn Texture>> {
        &self.textures
    }

    pub fn add_light(&mut self, light: QuadLight) {
        self.lights.push(light);
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    pub fn sensors(&self) -> &Vec<Box<dyn Sensor>> {
        &self.sensors
    }

    pub fn camera(&self, camera_id: usize) -> Option<&dyn Sensor> {
        self.sensors.get(camera_id).map(|s| s.as_ref())
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn set_base_dir(&mut self, base_dir: std::path::PathBuf) {
        self.base_dir = base_dir;
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<(usize, SurfaceIntersection)> {
        let mut closest: Option<(usize, SurfaceIntersection)> = None;
        let mut segment = *ray;
        for (idx, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(&segment) {
                segment.max_t = hit.t();
                closest = Some((idx, hit));
            }
        }
        closest
    }

    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.objects.iter().any(|object| object.shape.ray_intersection_t(ray))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneQuery for Scene {
    fn trace(&self, ray: &Ray3f) -> Option<HitRecord> {
        self.ray_intersection(ray).map(|(idx, hit)| {
            HitRecord::from_intersection(&hit, self.objects[idx].material_id)
        })
    }

    fn occluded(&self, ray: &Ray3f) -> bool {
        self.ray_intersection_t(ray)
    }

    fn material(&self, hit: &HitRecord) -> DisneyMaterial {
        match self.materials.get(hit.material_id) {
            Some(params) => params.resolve(hit.uv, &self.textures),
            None => {
                trace!("material {} not bound, shading with the default", hit.material_id);
                DisneyMaterial::default()
            }
        }
    }

    fn lights(&self) -> &[QuadLight] {
        &self.lights
    }

    fn background(&self, dir: &Vector3f) -> RGBSpectrum {
        self.background.eval(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::params::{ColorParam, ScalarParam};
    use crate::math::constants::{Float, Vector2f};
    use crate::shapes::rectangle::Rectangle;
    use crate::textures::constant::ConstantTexture;

    struct TestShape {
        t: Float,
    }

    impl TestShape {
        fn new(t: Float) -> Self {
            Self { t }
        }
    }

    impl Shape for TestShape {
        fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
            if self.t < ray.min_t || self.t > ray.max_t {
                return None;
            }

            let p = ray.at(self.t);
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let uv = Vector2f::new(0.0, 0.0);
            Some(SurfaceIntersection::new(p, n, uv, self.t))
        }

        fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
            ray.test_segment(self.t)
        }

        fn surface_area(&self) -> Float {
            1.0
        }

        fn describe(&self) -> String {
            String::from("TestShape")
        }
    }

    #[test]
    fn test_scene_trace_closest_hit() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(5.0)), 0));
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(2.0)), 1));
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(10.0)), 2));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = scene.trace(&ray).expect("expected intersection");

        assert_eq!(hit.distance, 2.0);
        assert_eq!(hit.material_id, 1);
    }

    #[test]
    fn test_scene_occlusion_respects_segment() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(5.0)), 0));

        let long = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, Some(6.0));
        let short = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, Some(4.0));
        assert!(scene.occluded(&long));
        assert!(!scene.occluded(&short));
    }

    #[test]
    fn test_lights_are_not_geometry() {
        let mut scene = Scene::new();
        scene.add_light(QuadLight::new(RGBSpectrum::splat(1.0),
                                       Vector3f::new(0.0, 0.0, 3.0),
                                       Vector3f::new(0.0, 0.0, -1.0),
                                       Vector3f::new(1.0, 0.0, 0.0),
                                       Vector3f::new(0.0, 1.0, 0.0),
                                       1.0, 1.0));
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(scene.trace(&ray).is_none());
        assert!(!scene.occluded(&ray));
        assert_eq!(scene.lights().len(), 1);
    }

    #[test]
    fn test_material_lookup_with_texture() {
        let mut scene = Scene::new();
        let tex = scene.add_texture(Box::new(ConstantTexture::new(RGBSpectrum::new(0.1, 0.6, 0.3))));
        let mut params = MaterialParams::default();
        params.base_color = ColorParam::Texture(tex);
        params.roughness = ScalarParam::Texture { id: tex, channel: 1 };
        let id = scene.add_material(params);
        scene.add_object(SceneObject::new(Arc::new(Rectangle::new(Vector3f::zeros(),
                                                                  Vector3f::new(1.0, 0.0, 0.0),
                                                                  Vector3f::new(0.0, 1.0, 0.0))), id));

        let ray = Ray3f::new(Vector3f::new(0.2, 0.1, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.trace(&ray).expect("expected hit");
        let m = scene.material(&hit);
        assert_eq!(m.base_color, RGBSpectrum::new(0.1, 0.6, 0.3));
        assert!((m.roughness - 0.6).abs() < 1e-6);

        let unbound = HitRecord::new(1.0, Vector3f::z(), Vector2f::zeros(), 42);
        assert_eq!(scene.material(&unbound), DisneyMaterial::default());
    }

    #[test]
    fn test_scene_background() {
        let mut scene = Scene::new();
        scene.set_background(Background::Constant(RGBSpectrum::splat(0.25)));
        assert_eq!(scene.background(&Vector3f::new(0.0, 1.0, 0.0)), RGBSpectrum::splat(0.25));
    }
}
