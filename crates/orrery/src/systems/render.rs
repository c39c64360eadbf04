use log::debug;

use crate::core::catalog::BodyCatalog;
use crate::core::kinematics::KinematicsUpdater;
use crate::core::scene::SceneGraph;
use crate::renderer::instance::{BodyInstance, InstanceBuffer};

/// Build the instance buffer from the current scene.
/// One instance per body that has both a mesh node and a catalog entry,
/// in body-id order. Anything past `max_instances` is dropped.
pub fn build_instances(
    scene: &SceneGraph,
    bodies: &KinematicsUpdater,
    catalog: &BodyCatalog,
    max_instances: usize,
    buffer: &mut InstanceBuffer,
) {
    buffer.clear();

    for (id, body) in bodies.iter() {
        if buffer.instances.len() >= max_instances {
            debug!("instance buffer full at {max_instances}, dropping the rest");
            break;
        }
        let Some(info) = catalog.get(id) else {
            continue;
        };
        let (Some(pos), Some(rotation)) = (scene.world_position(body.mesh()), scene.world_rotation_y(body.mesh()))
        else {
            continue;
        };

        let [r, g, b] = info.color;
        buffer.push(BodyInstance {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            radius: info.radius,
            rotation,
            r,
            g,
            b,
        });
    }
}
