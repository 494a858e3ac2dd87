use crate::color::RGB;
use crate::vec3::Point;
use colored::Colorize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLight {
    #[serde(skip)]
    pub name: String,
    pub pos: Point,
    pub rgb: RGB,
}

impl PointLight {
    pub fn new(pos: Point, rgb: RGB) -> PointLight {
        PointLight {
            name: "point-light".to_owned(),
            pos,
            rgb,
        }
    }
    pub fn display(&self) {
        let s = format!("{:?} {:?}", self.pos, self.rgb).dimmed();
        println!("-- {:12}: {s}", self.name.blue());
    }
}
