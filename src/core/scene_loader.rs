// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::scene::{Scene, SceneObject, SceneQuery};
use crate::core::shape::Shape;
use crate::emitters::background::Background;
use crate::emitters::quad::QuadLight;
use crate::integrators::path::IntegratorSettings;
use crate::materials::params::{ColorParam, MaterialParams, ScalarParam};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;
use crate::shapes::triangle::Triangle;
use crate::textures::constant::ConstantTexture;
use crate::textures::image::ImageTexture;

const DEFAULT_FOV_DEGREES: Float = 45.0;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Parse(String),
    MissingField(&'static str),
    UnknownReference(String),
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "io error: {}", e),
            SceneLoadError::Xml(e) => write!(f, "xml error: {}", e),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::UnknownReference(id) => write!(f, "unknown reference: {}", id),
        }
    }
}

impl std::error::Error for SceneLoadError {}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<quick_xml::Error> for SceneLoadError {
    fn from(err: quick_xml::Error) -> Self {
        SceneLoadError::Xml(err)
    }
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub settings: IntegratorSettings,
    /// Frame count requested by the file, if any.
    pub frames: Option<u32>,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let result = load_scene_with_settings(path)?;
    Ok(result.scene)
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    info!("Loading scene from {}", path.display());
    parse_scene(&xml, base_dir)
}

/// Parses a scene document. Relative texture paths are resolved against
/// `base_dir`.
pub fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut builder = SceneBuilder::new(base_dir);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => builder.start(&e, false)?,
            Event::Empty(e) => builder.start(&e, true)?,
            Event::End(e) => builder.end(e.name().as_ref())?,
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Integrator,
    Sensor,
    Texture { id: String, kind: String },
    Bsdf { id: Option<String>, kind: String },
    Shape { id: Option<String>, kind: String },
    Emitter { kind: String },
    Background { kind: String },
}

impl Block {
    fn tag(&self) -> &'static [u8] {
        match self {
            Block::Integrator => b"integrator",
            Block::Sensor => b"sensor",
            Block::Texture { .. } => b"texture",
            Block::Bsdf { .. } => b"bsdf",
            Block::Shape { .. } => b"shape",
            Block::Emitter { .. } => b"emitter",
            Block::Background { .. } => b"background",
        }
    }
}

struct TextureBinding {
    param: String,
    texture: String,
    channel: usize,
}

/// Named values collected inside one block.
#[derive(Default)]
struct Properties {
    values: HashMap<String, String>,
    textures: Vec<TextureBinding>,
    refs: Vec<String>,
}

impl Properties {
    fn float(&self, name: &str) -> Result<Option<Float>, SceneLoadError> {
        self.values.get(name).map(|v| parse_float(v)).transpose()
    }

    fn integer(&self, name: &str) -> Result<Option<u32>, SceneLoadError> {
        self.values.get(name).map(|v| parse_u32(v)).transpose()
    }

    fn boolean(&self, name: &str) -> Result<Option<bool>, SceneLoadError> {
        self.values.get(name).map(|v| parse_bool(v)).transpose()
    }

    fn vec3(&self, name: &str) -> Result<Option<Vector3f>, SceneLoadError> {
        self.values.get(name).map(|v| parse_vec3(v)).transpose()
    }

    fn rgb(&self, name: &str) -> Result<Option<RGBSpectrum>, SceneLoadError> {
        Ok(self.vec3(name)?.map(RGBSpectrum::from_vector))
    }

    fn required_float(&self, name: &str, field: &'static str) -> Result<Float, SceneLoadError> {
        self.float(name)?.ok_or(SceneLoadError::MissingField(field))
    }

    fn required_vec3(&self, name: &str, field: &'static str) -> Result<Vector3f, SceneLoadError> {
        self.vec3(name)?.ok_or(SceneLoadError::MissingField(field))
    }
}

struct SceneBuilder<'a> {
    base_dir: &'a Path,
    defaults: HashMap<String, String>,
    scene: Scene,
    settings: IntegratorSettings,
    frames: Option<u32>,
    texture_ids: HashMap<String, usize>,
    material_ids: HashMap<String, usize>,
    default_material: Option<usize>,
    block: Option<Block>,
    props: Properties,
}

impl<'a> SceneBuilder<'a> {
    fn new(base_dir: &'a Path) -> Self {
        let mut scene = Scene::new();
        scene.set_base_dir(base_dir.to_path_buf());
        Self {
            base_dir,
            defaults: HashMap::new(),
            scene,
            settings: IntegratorSettings::default(),
            frames: None,
            texture_ids: HashMap::new(),
            material_ids: HashMap::new(),
            default_material: None,
            block: None,
            props: Properties::default(),
        }
    }

    fn attributes(&self, e: &BytesStart) -> Result<HashMap<String, String>, SceneLoadError> {
        let mut attrs = HashMap::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = resolve_value(&attr.unescape_value()?, &self.defaults);
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    fn open(&mut self, block: Block) -> Result<(), SceneLoadError> {
        if let Some(current) = &self.block {
            return Err(SceneLoadError::Parse(format!(
                "<{}> inside <{}>",
                String::from_utf8_lossy(block.tag()),
                String::from_utf8_lossy(current.tag()))));
        }
        self.block = Some(block);
        self.props = Properties::default();
        Ok(())
    }

    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<(), SceneLoadError> {
        let name = e.name();
        let name = name.as_ref();
        let mut attrs = self.attributes(e)?;
        let kind = attrs.remove("type").unwrap_or_default();

        match name {
            b"scene" | b"film" | b"transform" => {}
            b"default" => {
                if let (Some(k), Some(v)) = (attrs.remove("name"), attrs.remove("value")) {
                    self.defaults.insert(k, v);
                }
            }
            b"integrator" => {
                if kind != "path" {
                    return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", kind)));
                }
                self.open(Block::Integrator)?;
            }
            b"sensor" => {
                if kind != "perspective" {
                    return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", kind)));
                }
                self.open(Block::Sensor)?;
            }
            b"texture" => {
                if let Some(Block::Bsdf { .. }) = self.block {
                    let param = attrs.remove("name").ok_or(SceneLoadError::MissingField("texture.name"))?;
                    let texture = attrs.remove("ref").ok_or(SceneLoadError::MissingField("texture.ref"))?;
                    let channel = match attrs.remove("channel") {
                        Some(c) => parse_u32(&c)? as usize,
                        None => 0,
                    };
                    self.props.textures.push(TextureBinding { param, texture, channel });
                } else {
                    let id = attrs.remove("id").ok_or(SceneLoadError::MissingField("texture.id"))?;
                    self.open(Block::Texture { id, kind })?;
                }
            }
            b"bsdf" => self.open(Block::Bsdf { id: attrs.remove("id"), kind })?,
            b"shape" => self.open(Block::Shape { id: attrs.remove("id"), kind })?,
            b"emitter" => self.open(Block::Emitter { kind })?,
            b"background" => self.open(Block::Background { kind })?,
            b"float" | b"integer" | b"boolean" | b"string" | b"rgb" | b"point" | b"vector" => {
                if self.block.is_none() {
                    warn!("ignoring <{}> outside of any block", String::from_utf8_lossy(name));
                } else if let (Some(k), Some(v)) = (attrs.remove("name"), attrs.remove("value")) {
                    self.props.values.insert(k, v);
                }
            }
            b"lookat" => {
                for key in ["origin", "target", "up"].iter() {
                    if let Some(v) = attrs.remove(*key) {
                        self.props.values.insert(key.to_string(), v);
                    }
                }
            }
            b"ref" => {
                let id = attrs.remove("id").ok_or(SceneLoadError::MissingField("ref.id"))?;
                self.props.refs.push(id);
            }
            other => warn!("ignoring unknown element <{}>", String::from_utf8_lossy(other)),
        }

        if empty {
            self.end(name)?;
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), SceneLoadError> {
        let closes_block = match &self.block {
            Some(block) => block.tag() == name,
            None => false,
        };
        if !closes_block {
            return Ok(());
        }
        let block = match self.block.take() {
            Some(block) => block,
            None => return Ok(()),
        };
        let props = std::mem::take(&mut self.props);
        match block {
            Block::Integrator => self.build_integrator(&props),
            Block::Sensor => self.build_sensor(&props),
            Block::Texture { id, kind } => self.build_texture(id, &kind, &props),
            Block::Bsdf { id, kind } => self.build_bsdf(id, &kind, &props),
            Block::Shape { id, kind } => self.build_shape(id, &kind, &props),
            Block::Emitter { kind } => self.build_emitter(&kind, &props),
            Block::Background { kind } => self.build_background(&kind, &props),
        }
    }

    fn build_integrator(&mut self, props: &Properties) -> Result<(), SceneLoadError> {
        if let Some(v) = props.integer("max_depth")? {
            self.settings.max_depth = v;
        }
        if let Some(v) = props.integer("rr_depth")? {
            self.settings.rr_start_bounce = v;
        }
        if let Some(v) = props.float("rr_min_probability")? {
            self.settings.rr_min_probability = v;
        }
        if let Some(v) = props.float("pdf_epsilon")? {
            self.settings.pdf_epsilon = v;
        }
        if let Some(v) = props.boolean("russian_roulette")? {
            self.settings.russian_roulette = v;
        }
        self.frames = props.integer("frames")?;
        Ok(())
    }

    fn build_sensor(&mut self, props: &Properties) -> Result<(), SceneLoadError> {
        let fov = props.float("fov")?.unwrap_or(DEFAULT_FOV_DEGREES);
        let origin = props.required_vec3("origin", "sensor.origin")?;
        let target = props.required_vec3("target", "sensor.target")?;
        let up = props.vec3("up")?.unwrap_or_else(|| Vector3f::new(0.0, 1.0, 0.0));
        let width = props.integer("width")?.ok_or(SceneLoadError::MissingField("film.width"))?;
        let height = props.integer("height")?.ok_or(SceneLoadError::MissingField("film.height"))?;
        if width == 0 || height == 0 {
            return Err(SceneLoadError::Parse(format!("empty film {}x{}", width, height)));
        }

        let camera = PerspectiveCamera::new(origin, target, up, fov.to_radians(),
                                            width as usize, height as usize);
        self.scene.add_sensor(Box::new(camera));
        Ok(())
    }

    fn build_texture(&mut self, id: String, kind: &str, props: &Properties) -> Result<(), SceneLoadError> {
        let index = match kind {
            "bitmap" => {
                let filename = props.values.get("filename")
                    .ok_or(SceneLoadError::MissingField("texture.filename"))?;
                let filename = if Path::new(filename).is_absolute() {
                    filename.clone()
                } else {
                    self.base_dir.join(filename).to_string_lossy().to_string()
                };
                let texture = ImageTexture::from_file(&filename).map_err(SceneLoadError::Parse)?;
                self.scene.add_texture(Box::new(texture))
            }
            "constant" => {
                let value = props.rgb("value")?.ok_or(SceneLoadError::MissingField("texture.value"))?;
                self.scene.add_texture(Box::new(ConstantTexture::new(value)))
            }
            _ => return Err(SceneLoadError::Parse(format!("unsupported texture: {}", kind))),
        };
        self.texture_ids.insert(id, index);
        Ok(())
    }

    fn build_bsdf(&mut self, id: Option<String>, kind: &str, props: &Properties) -> Result<(), SceneLoadError> {
        if kind != "principled" && kind != "disney" {
            return Err(SceneLoadError::Parse(format!("unsupported bsdf: {}", kind)));
        }

        let mut params = MaterialParams::default();
        if let Some(color) = props.rgb("base_color")? {
            params.base_color = ColorParam::Value(color);
        }
        for name in SCALAR_PARAMS.iter() {
            if let Some(v) = props.float(name)? {
                if let Some(slot) = scalar_param_mut(&mut params, name) {
                    *slot = ScalarParam::Value(v);
                }
            }
        }
        for binding in props.textures.iter() {
            let texture = *self.texture_ids.get(&binding.texture)
                .ok_or_else(|| SceneLoadError::UnknownReference(binding.texture.clone()))?;
            if binding.param == "base_color" {
                params.base_color = ColorParam::Texture(texture);
            } else {
                let slot = scalar_param_mut(&mut params, &binding.param)
                    .ok_or_else(|| SceneLoadError::Parse(format!("unknown material parameter: {}", binding.param)))?;
                *slot = ScalarParam::Texture { id: texture, channel: binding.channel };
            }
        }

        let index = self.scene.add_material(params);
        if let Some(id) = id {
            self.material_ids.insert(id, index);
        }
        Ok(())
    }

    fn shape_material(&mut self, props: &Properties) -> Result<usize, SceneLoadError> {
        match props.refs.first() {
            Some(id) => self.material_ids.get(id).copied()
                .ok_or_else(|| SceneLoadError::UnknownReference(id.clone())),
            None => {
                if let Some(index) = self.default_material {
                    return Ok(index);
                }
                let index = self.scene.add_material(MaterialParams::default());
                self.default_material = Some(index);
                Ok(index)
            }
        }
    }

    fn build_shape(&mut self, id: Option<String>, kind: &str, props: &Properties) -> Result<(), SceneLoadError> {
        let material = self.shape_material(props)?;
        let shape: Arc<dyn Shape> = match kind {
            "rectangle" => Arc::new(Rectangle::new(props.required_vec3("center", "rectangle.center")?,
                                                   props.required_vec3("edge_x", "rectangle.edge_x")?,
                                                   props.required_vec3("edge_y", "rectangle.edge_y")?)),
            "sphere" => Arc::new(Sphere::new(props.required_vec3("center", "sphere.center")?,
                                             props.required_float("radius", "sphere.radius")?)),
            "triangle" => Arc::new(Triangle::new(props.required_vec3("p0", "triangle.p0")?,
                                                 props.required_vec3("p1", "triangle.p1")?,
                                                 props.required_vec3("p2", "triangle.p2")?)),
            _ => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", kind))),
        };

        let mut object = SceneObject::new(shape, material);
        if let Some(id) = id {
            object = object.with_name(id);
        }
        self.scene.add_object(object);
        Ok(())
    }

    fn build_emitter(&mut self, kind: &str, props: &Properties) -> Result<(), SceneLoadError> {
        if kind != "quad" {
            return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", kind)));
        }
        let radiance = props.rgb("radiance")?.ok_or(SceneLoadError::MissingField("emitter.radiance"))?;
        let position = props.required_vec3("position", "emitter.position")?;
        let edge_x = props.required_vec3("edge_x", "emitter.edge_x")?;
        let edge_y = props.required_vec3("edge_y", "emitter.edge_y")?;
        if edge_x.cross(&edge_y).norm() <= 0.0 {
            return Err(SceneLoadError::Parse(String::from("degenerate quad light")));
        }
        let light = QuadLight::from_edges(radiance, position, edge_x, edge_y);
        debug!("Adding {}", light.describe());
        self.scene.add_light(light);
        Ok(())
    }

    fn build_background(&mut self, kind: &str, props: &Properties) -> Result<(), SceneLoadError> {
        let background = match kind {
            "constant" => Background::Constant(props.rgb("radiance")?.unwrap_or_default()),
            "checker" => {
                let (bright, dark, cells) = match Background::default() {
                    Background::Checker { bright, dark, cells } => (bright, dark, cells),
                    Background::Constant(c) => (c, c, 1.0),
                };
                Background::Checker {
                    bright: props.rgb("bright")?.unwrap_or(bright),
                    dark: props.rgb("dark")?.unwrap_or(dark),
                    cells: props.float("cells")?.unwrap_or(cells),
                }
            }
            _ => return Err(SceneLoadError::Parse(format!("unsupported background: {}", kind))),
        };
        self.scene.set_background(background);
        Ok(())
    }

    fn finish(self) -> Result<SceneLoadResult, SceneLoadError> {
        if let Some(block) = self.block {
            return Err(SceneLoadError::Parse(format!("unterminated <{}>",
                                                     String::from_utf8_lossy(block.tag()))));
        }
        info!("Scene loaded: {} objects, {} lights, {} materials, {} textures, {} sensors",
              self.scene.len(), self.scene.lights().len(), self.scene.materials().len(),
              self.scene.textures().len(), self.scene.sensors().len());
        Ok(SceneLoadResult {
            scene: self.scene,
            settings: self.settings,
            frames: self.frames,
        })
    }
}

const SCALAR_PARAMS: [&str; 11] = [
    "metallic", "specular", "roughness", "specular_tint", "anisotropy", "sheen",
    "sheen_tint", "clearcoat", "clearcoat_gloss", "ior", "specular_transmission",
];

fn scalar_param_mut<'p>(params: &'p mut MaterialParams, name: &str) -> Option<&'p mut ScalarParam> {
    match name {
        "metallic" => Some(&mut params.metallic),
        "specular" => Some(&mut params.specular),
        "roughness" => Some(&mut params.roughness),
        "specular_tint" => Some(&mut params.specular_tint),
        "anisotropy" => Some(&mut params.anisotropy),
        "sheen" => Some(&mut params.sheen),
        "sheen_tint" => Some(&mut params.sheen_tint),
        "clearcoat" => Some(&mut params.clearcoat),
        "clearcoat_gloss" => Some(&mut params.clearcoat_gloss),
        "ior" => Some(&mut params.ior),
        "specular_transmission" => Some(&mut params.specular_transmission),
        _ => None,
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<u32, SceneLoadError> {
    value.trim().parse::<u32>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, SceneLoadError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(SceneLoadError::Parse(format!("invalid boolean: {}", value))),
    }
}

/// Three comma or whitespace separated numbers; a single number is splatted.
fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let parts: Vec<&str> = value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    match parts.len() {
        1 => {
            let v = parse_float(parts[0])?;
            Ok(Vector3f::new(v, v, v))
        }
        3 => Ok(Vector3f::new(parse_float(parts[0])?, parse_float(parts[1])?, parse_float(parts[2])?)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}
