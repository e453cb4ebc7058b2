//! The desk scene: materials, lights and the object list.
//!
//! Positions are in world units with the table top centred on the origin.
//! Every object carries its full render state, including values that would
//! otherwise be inherited from the object drawn before it.

use cgmath::Vector3;

use crate::{
    data_structures::{
        light::{LightRig, LightSource},
        material::Material,
        transform::{EulerDegrees, Transform},
    },
    draw_state::RenderState,
    resources::mesh::Shape,
    scene::SceneObject,
};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const ORANGE: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const DARK_BROWN: [f32; 4] = [0.3, 0.15, 0.05, 1.0];
const WOOD_BROWN: [f32; 4] = [0.6, 0.4, 0.2, 1.0];
const PENCIL_YELLOW: [f32; 4] = [1.0, 0.85, 0.0, 1.0];
const VERY_DARK_GRAY: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const COFFEE_BROWN: [f32; 4] = [0.5, 0.25, 0.1, 1.0];

pub fn materials() -> Vec<Material> {
    vec![
        Material::new("gold", (1.0, 0.9, 0.6), 0.5, (0.8, 0.6, 0.2), (1.0, 0.8, 0.6), 2.0),
        Material::new("cement", (0.3, 0.3, 0.3), 0.2, (0.5, 0.5, 0.5), (0.2, 0.2, 0.2), 2.0),
        Material::new("wood", (0.5, 0.3, 0.1), 0.3, (0.6, 0.4, 0.2), (0.2, 0.15, 0.1), 8.0),
        Material::new("tile", (0.3, 0.3, 0.4), 0.4, (0.5, 0.4, 0.3), (0.6, 0.6, 0.6), 24.0),
        Material::new("glass", (0.3, 0.4, 0.4), 0.1, (0.1, 0.1, 0.1), (1.8, 1.8, 1.8), 64.0),
        Material::new("clay", (0.4, 0.3, 0.2), 0.3, (0.6, 0.5, 0.4), (0.2, 0.2, 0.2), 4.0),
    ]
}

fn light(
    position: (f32, f32, f32),
    ambient: f32,
    diffuse: (f32, f32, f32),
    specular: f32,
    focal_strength: f32,
    specular_intensity: f32,
) -> LightSource {
    LightSource {
        position: position.into(),
        ambient_color: Vector3::new(ambient, ambient, ambient),
        diffuse_color: diffuse.into(),
        specular_color: Vector3::new(specular, specular, specular),
        focal_strength,
        specular_intensity,
    }
}

/// Key light above the viewer, a cool fill from the left, a warm lamp on the
/// right and a dim rim light behind the monitor.
pub fn lights() -> LightRig {
    let mut rig = LightRig::new();
    rig.add(light((0.0, 14.0, 8.0), 0.15, (0.7, 0.7, 0.65), 0.6, 32.0, 0.4));
    rig.add(light((-12.0, 8.0, 6.0), 0.05, (0.3, 0.3, 0.35), 0.2, 16.0, 0.2));
    rig.add(light((12.0, 9.0, 4.0), 0.05, (0.4, 0.3, 0.2), 0.25, 16.0, 0.25));
    rig.add(light((0.0, 10.0, -12.0), 0.02, (0.25, 0.25, 0.25), 0.3, 24.0, 0.3));
    rig
}

fn at(scale: (f32, f32, f32), x_rotation: f32, position: (f32, f32, f32)) -> Transform {
    Transform::from_parts(scale, EulerDegrees::new(x_rotation, 0.0, 0.0), position)
}

fn colored(label: &str, shape: Shape, transform: Transform, color: [f32; 4], material: &str) -> SceneObject {
    SceneObject::new(label, shape, RenderState::colored(transform, color, material))
}

fn textured(label: &str, shape: Shape, transform: Transform, texture: &str, material: &str) -> SceneObject {
    SceneObject::new(label, shape, RenderState::textured(transform, texture, material))
}

fn books(objects: &mut Vec<SceneObject>) {
    objects.extend([
        colored("book 1 pages", Shape::Box, at((2.6, 0.2, 3.0), 3.0, (-6.5, 4.5, 1.5)), WHITE, "cement"),
        textured("book 1 cover", Shape::Box, at((2.6, 0.3, 3.0), 3.0, (-6.5, 4.7, 1.5)), "plant", "cement"),
        colored("book 2 pages", Shape::Box, at((2.6, 0.3, 3.0), 3.0, (-6.5, 4.0, 1.5)), WHITE, "cement"),
        colored("book 2 cover", Shape::Box, at((2.6, 0.3, 3.0), 3.0, (-6.5, 4.3, 1.5)), GREEN, "cement"),
        colored("book 3 pages", Shape::Box, at((2.8, 0.4, 3.0), 3.0, (-6.5, 3.5, 1.5)), WHITE, "cement"),
        colored("book 3 cover", Shape::Box, at((2.8, 0.2, 3.0), 0.0, (-6.5, 3.75, 1.5)), ORANGE, "cement"),
    ]);
}

fn pencils(objects: &mut Vec<SceneObject>) {
    for (i, x) in [6.0, 5.7].into_iter().enumerate() {
        let position = (x, 5.0, -1.0);
        let n = i + 1;
        objects.extend([
            colored(&format!("pencil {n} lead"), Shape::Cone, at((0.1, 0.1, 0.2), 0.0, position), DARK_BROWN, "clay"),
            colored(&format!("pencil {n} tip"), Shape::Cone, at((0.1, 0.2, 0.2), 0.0, position), WOOD_BROWN, "clay"),
            colored(&format!("pencil {n} body"), Shape::Cone, at((0.1, 0.8, 0.2), 0.0, position), PENCIL_YELLOW, "clay"),
        ]);
    }
}

fn pencil_holder(objects: &mut Vec<SceneObject>) {
    objects.extend([
        colored("pencil holder opening", Shape::Cylinder, at((1.0, 0.1, 1.0), 0.0, (5.8, 5.0, -1.3)), VERY_DARK_GRAY, "glass"),
        textured("pencil holder", Shape::Cylinder, at((1.0, 2.0, 1.0), 0.0, (5.8, 3.0, -1.3)), "tile", "cement"),
    ]);
}

fn mug(objects: &mut Vec<SceneObject>) {
    objects.extend([
        colored("coffee", Shape::Cylinder, at((1.0, 0.1, 1.2), 0.0, (8.5, 5.6, 2.0)), COFFEE_BROWN, "cement"),
        textured("mug rim", Shape::Cylinder, at((1.2, 0.2, 1.2), 0.0, (8.5, 5.5, 2.0)), "marble", "gold"),
        textured("mug body", Shape::Cylinder, at((1.2, 2.5, 1.2), 0.0, (8.5, 3.0, 2.0)), "gold", "cement"),
        textured("mug handle", Shape::Torus, at((0.4, 0.5, 1.5), 0.0, (10.0, 4.5, 2.0)), "gold", "cement"),
    ]);
}

fn monitor(objects: &mut Vec<SceneObject>) {
    objects.extend([
        colored("screen", Shape::Plane, at((6.5, 10.0, 4.0), 75.0, (0.0, 10.3, -2.0)), WHITE, "glass"),
        textured("screen frame", Shape::Plane, at((8.0, 10.0, 5.0), 75.0, (0.0, 10.5, -3.0)), "metallic", "cement"),
    ]);
}

fn mouse(objects: &mut Vec<SceneObject>) {
    objects.extend([
        colored("mouse ball", Shape::Sphere, at((0.2, 0.2, 0.2), 0.0, (5.0, 3.55, 1.7)), RED, "glass"),
        textured("mouse", Shape::Box, at((1.0, 0.1, 1.0), 0.0, (5.0, 3.55, 2.0)), "metallic", "glass"),
    ]);
}

fn key(objects: &mut Vec<SceneObject>, label: &str, x: f32, z: f32) {
    objects.extend([
        colored(&format!("{label} letter"), Shape::Plane, at((0.03, 0.03, 0.03), 0.0, (x, 3.75, z)), BLACK, "glass"),
        textured(label, Shape::Box, at((0.2, 0.3, 0.2), 0.0, (x, 3.55, z)), "metallic", "glass"),
    ]);
}

fn keyboard(objects: &mut Vec<SceneObject>) {
    const ROWS: [f32; 3] = [1.5, 2.0, 2.5];
    for (row, z) in ROWS.into_iter().enumerate() {
        // ten keys per row, 0.4 apart, starting at x = -2.4
        for column in 0..10 {
            let x = -2.4 + 0.4 * column as f32;
            key(objects, &format!("key {row}-{column}"), x, z);
        }
    }
    objects.extend([
        textured("space bar", Shape::Box, at((3.8, 0.3, 0.2), 0.0, (-0.6, 3.55, 2.9)), "metallic", "glass"),
        textured("right space bar", Shape::Box, at((1.0, 0.3, 0.2), 0.0, (2.4, 3.55, 2.9)), "metallic", "glass"),
    ]);
    // one letter per numpad key; the middle row's right letter is not drawn twice
    for (row, z) in ROWS.into_iter().enumerate() {
        for (column, x) in [2.0, 2.4, 2.8].into_iter().enumerate() {
            key(objects, &format!("numpad {row}-{column}"), x, z);
        }
    }
    objects.push(textured(
        "keyboard base",
        Shape::Plane,
        at((3.0, 0.1, 1.0), 0.0, (0.1, 3.55, 2.2)),
        "metallic",
        "cement",
    ));
}

fn table(objects: &mut Vec<SceneObject>) {
    objects.extend([
        textured("monitor stand", Shape::Plane, at((1.5, 10.0, 3.0), 90.0, (0.5, 3.0, -1.8)), "metallic", "cement"),
        textured("table top", Shape::Box, at((22.0, 1.0, 10.0), 0.0, (0.0, 3.0, 0.0)), "marble", "gold"),
        textured("table base", Shape::Box, at((22.0, 5.0, 10.0), 0.0, (0.0, 0.0, 0.0)), "plank", "clay"),
    ]);
}

/// Every object of the desk scene in draw order.
pub fn objects() -> Vec<SceneObject> {
    let mut objects = Vec::new();
    books(&mut objects);
    pencils(&mut objects);
    pencil_holder(&mut objects);
    mug(&mut objects);
    monitor(&mut objects);
    mouse(&mut objects);
    keyboard(&mut objects);
    table(&mut objects);
    objects
}
