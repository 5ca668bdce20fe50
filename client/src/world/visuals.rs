use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualShape {
    Cuboid(Vec3),
    Sphere(f32),
    Capsule { radius: f32, length: f32 },
}

/// Primitive mesh and colour resolved into render components once assets exist.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelVisual {
    pub shape: VisualShape,
    pub colour: Color,
}

impl LevelVisual {
    pub fn cuboid(size: Vec3, colour: Color) -> Self {
        Self {
            shape: VisualShape::Cuboid(size),
            colour,
        }
    }

    pub fn sphere(radius: f32, colour: Color) -> Self {
        Self {
            shape: VisualShape::Sphere(radius),
            colour,
        }
    }

    pub fn capsule(radius: f32, length: f32, colour: Color) -> Self {
        Self {
            shape: VisualShape::Capsule { radius, length },
            colour,
        }
    }

    fn mesh(&self) -> Mesh {
        match self.shape {
            VisualShape::Cuboid(size) => Cuboid::from_size(size).into(),
            VisualShape::Sphere(radius) => Sphere::new(radius).into(),
            VisualShape::Capsule { radius, length } => Capsule3d::new(radius, length).into(),
        }
    }

    fn material(&self) -> StandardMaterial {
        let alpha_mode = if self.colour.alpha() < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        };
        StandardMaterial {
            base_color: self.colour,
            alpha_mode,
            perceptual_roughness: 0.8,
            ..default()
        }
    }
}

/// Headless apps run without mesh assets, so visuals are attached lazily.
pub fn attach_level_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    pending: Query<(Entity, &LevelVisual), Without<Mesh3d>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };

    for (entity, visual) in &pending {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(visual.mesh())),
            MeshMaterial3d(materials.add(visual.material())),
        ));
    }
}
