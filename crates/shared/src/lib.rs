use serde::{Deserialize, Serialize};

/// Уникальный идентификатор меша у геометрического провайдера
pub type MeshId = String;

/// Плоскость рисования — земля, y = 0
pub const GROUND_Y: f64 = 0.0;

fn default_version() -> u32 {
    1
}

fn default_height() -> f64 {
    1.0
}

/// Точка в мировых координатах
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Точка на плоскости рисования (y = 0)
    pub fn on_ground(x: f64, z: f64) -> Self {
        Self { x, y: GROUND_Y, z }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Self {
        Self { x: a[0], y: a[1], z: a[2] }
    }
}

/// Замкнутый контур, нарисованный на земле, с высотой выдавливания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Вершины контура в порядке рисования (замыкание подразумевается)
    pub points: Vec<Point3>,
    /// Глубина выдавливания (по умолчанию 1.0)
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Shape {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points, height: default_height() }
    }
}

/// Сохраняемый набор контуров (вход для headless CLI и тестов)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShapeSetDescription {
    #[serde(default = "default_version")]
    pub version: u32,
    pub shapes: Vec<Shape>,
}
