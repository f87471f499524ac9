// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-scene state consumed by the render step pipeline.

use super::{
    CameraId, CapsuleLight, Layer, LayerId, LightId, LightList, ObjectId, ObjectRenderData,
    PointLight, RenderableId, ReorderMode, SceneError, SceneId, SceneLight,
};
use crate::math::LinearRgba;
use crate::renderer::api::TextureId;
use ahash::AHashMap;

/// A normalized viewport rectangle (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// A camera registered with a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The camera's handle.
    pub id: CameraId,
    /// Region of the target the camera renders into.
    pub viewport: Viewport,
    /// Column-major view-projection matrix.
    pub view_projection: [f32; 16],
}

impl Camera {
    /// A full-target camera with an identity view-projection.
    pub fn new(id: CameraId) -> Self {
        Self {
            id,
            viewport: Viewport::default(),
            view_projection: ObjectRenderData::IDENTITY,
        }
    }
}

/// Scene-wide presentation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Ambient light color.
    pub ambient: LinearRgba,
    /// Whether the scene is drawn at all.
    pub visible: bool,
    /// Optional skybox texture.
    pub skybox: Option<TextureId>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient: LinearRgba::BLACK,
            visible: true,
            skybox: None,
        }
    }
}

/// The render-thread mirror of one logical scene.
///
/// Layer order is draw order. Cameras are unordered. Only task processing on the
/// render thread mutates this structure.
#[derive(Debug)]
pub struct SceneRenderData {
    id: SceneId,
    layers: Vec<Layer>,
    cameras: AHashMap<CameraId, Camera>,
    point_lights: LightList<PointLight>,
    capsule_lights: LightList<CapsuleLight>,
    config: SceneConfig,
}

impl SceneRenderData {
    /// Creates an empty, visible scene with pre-sized light lists.
    pub fn new(id: SceneId, point_light_capacity: usize, capsule_light_capacity: usize) -> Self {
        Self {
            id,
            layers: Vec::new(),
            cameras: AHashMap::new(),
            point_lights: LightList::with_capacity(point_light_capacity),
            capsule_lights: LightList::with_capacity(capsule_light_capacity),
            config: SceneConfig::default(),
        }
    }

    /// The scene's handle.
    pub fn id(&self) -> SceneId {
        self.id
    }

    // --- Layers ---

    /// Appends a layer at the end of the draw order.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), SceneError> {
        if self.layer_index(layer.id()).is_some() {
            return Err(SceneError::DuplicateLayer(layer.id()));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Removes a layer by identity.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, SceneError> {
        let index = self
            .layer_index(id)
            .ok_or(SceneError::LayerNotFound(id))?;
        Ok(self.layers.remove(index))
    }

    /// Moves a layer within the draw order.
    ///
    /// Returns `false` without touching anything when the layer is not part of
    /// the scene.
    pub fn reorder_layer(&mut self, id: LayerId, mode: ReorderMode) -> bool {
        let Some(index) = self.layer_index(id) else {
            return false;
        };
        let layer = self.layers.remove(index);
        match mode {
            ReorderMode::PushBackward => self.layers.insert(index.saturating_sub(1), layer),
            ReorderMode::PushForward => {
                if index < self.layers.len() {
                    self.layers.insert(index + 1, layer);
                } else {
                    self.layers.push(layer);
                }
            }
            ReorderMode::BringToFront => self.layers.push(layer),
            ReorderMode::SendToBack => self.layers.insert(0, layer),
        }
        true
    }

    fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer handles in draw order.
    pub fn layer_order(&self) -> Vec<LayerId> {
        self.layers.iter().map(Layer::id).collect()
    }

    /// Returns a layer by handle.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Returns a layer by handle, mutably.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    // --- Renderables ---

    /// Adds an object instance of `renderable` to a layer.
    pub fn add_renderable(
        &mut self,
        layer: LayerId,
        renderable: RenderableId,
        object: ObjectRenderData,
    ) -> Result<(), SceneError> {
        self.layer_mut(layer)
            .ok_or(SceneError::LayerNotFound(layer))?
            .add_object(renderable, object);
        Ok(())
    }

    /// Removes an object instance of `renderable` from a layer.
    pub fn remove_renderable(
        &mut self,
        layer: LayerId,
        renderable: RenderableId,
        object: ObjectId,
    ) -> Result<ObjectRenderData, SceneError> {
        self.layer_mut(layer)
            .ok_or(SceneError::LayerNotFound(layer))?
            .remove_object(renderable, object)
    }

    // --- Cameras ---

    /// Inserts a camera, replacing any camera with the same handle.
    pub fn add_camera(&mut self, camera: Camera) {
        self.cameras.insert(camera.id, camera);
    }

    /// Removes a camera, returning it if it was present.
    pub fn remove_camera(&mut self, id: CameraId) -> Option<Camera> {
        self.cameras.remove(&id)
    }

    /// Returns a camera by handle.
    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(&id)
    }

    /// All cameras, in no particular order.
    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.values()
    }

    /// Number of cameras.
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    // --- Lights ---

    /// Inserts a light into the matching list.
    ///
    /// A light id lives in at most one list: re-adding it with the other
    /// shape moves it.
    pub fn add_light(&mut self, light: SceneLight) {
        match light {
            SceneLight::Point(id, point) => {
                self.capsule_lights.remove(id);
                self.point_lights.insert(id, point);
            }
            SceneLight::Capsule(id, capsule) => {
                self.point_lights.remove(id);
                self.capsule_lights.insert(id, capsule);
            }
        }
    }

    /// Removes a light from whichever list holds it.
    pub fn remove_light(&mut self, id: LightId) -> Result<(), SceneError> {
        if self.point_lights.remove(id).is_some() || self.capsule_lights.remove(id).is_some() {
            Ok(())
        } else {
            Err(SceneError::LightNotFound(id))
        }
    }

    /// Point light storage.
    pub fn point_lights(&self) -> &LightList<PointLight> {
        &self.point_lights
    }

    /// Capsule light storage.
    pub fn capsule_lights(&self) -> &LightList<CapsuleLight> {
        &self.capsule_lights
    }

    // --- Presentation ---

    /// Applies ambient color, visibility and skybox.
    pub fn configure(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Current presentation parameters.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Whether the scene is drawn.
    pub fn is_visible(&self) -> bool {
        self.config.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_layers() -> (SceneRenderData, [LayerId; 3]) {
        let mut scene = SceneRenderData::new(SceneId(1), 4, 4);
        let ids = [LayerId(1), LayerId(2), LayerId(3)];
        for (id, name) in ids.iter().zip(["a", "b", "c"]) {
            scene.add_layer(Layer::new(*id, name)).unwrap();
        }
        (scene, ids)
    }

    #[test]
    fn bring_to_front_moves_layer_last() {
        let (mut scene, [a, b, c]) = scene_with_layers();
        assert!(scene.reorder_layer(b, ReorderMode::BringToFront));
        assert_eq!(scene.layer_order(), vec![a, c, b]);
    }

    #[test]
    fn send_to_back_moves_layer_first() {
        let (mut scene, [a, b, c]) = scene_with_layers();
        assert!(scene.reorder_layer(b, ReorderMode::SendToBack));
        assert_eq!(scene.layer_order(), vec![b, a, c]);
    }

    #[test]
    fn push_forward_on_last_layer_keeps_position() {
        let (mut scene, [a, b, c]) = scene_with_layers();
        assert!(scene.reorder_layer(c, ReorderMode::PushForward));
        assert_eq!(scene.layer_order(), vec![a, b, c]);

        assert!(scene.reorder_layer(a, ReorderMode::PushForward));
        assert_eq!(scene.layer_order(), vec![b, a, c]);
    }

    #[test]
    fn push_backward_clamps_at_first_slot() {
        let (mut scene, [a, b, c]) = scene_with_layers();
        assert!(scene.reorder_layer(a, ReorderMode::PushBackward));
        assert_eq!(scene.layer_order(), vec![a, b, c]);

        assert!(scene.reorder_layer(c, ReorderMode::PushBackward));
        assert_eq!(scene.layer_order(), vec![a, c, b]);
    }

    #[test]
    fn reordering_unknown_layer_is_a_no_op() {
        let (mut scene, ids) = scene_with_layers();
        assert!(!scene.reorder_layer(LayerId(42), ReorderMode::SendToBack));
        assert_eq!(scene.layer_order(), ids.to_vec());
    }

    #[test]
    fn duplicate_and_missing_layers_are_errors() {
        let (mut scene, [a, ..]) = scene_with_layers();
        assert_eq!(
            scene.add_layer(Layer::new(a, "again")).unwrap_err(),
            SceneError::DuplicateLayer(a)
        );
        assert_eq!(
            scene.remove_layer(LayerId(42)).unwrap_err(),
            SceneError::LayerNotFound(LayerId(42))
        );
        assert_eq!(scene.remove_layer(a).unwrap().name(), "a");
        assert_eq!(scene.layers().len(), 2);
    }

    #[test]
    fn cameras_behave_as_a_set() {
        let mut scene = SceneRenderData::new(SceneId(1), 0, 0);
        scene.add_camera(Camera::new(CameraId(1)));
        scene.add_camera(Camera::new(CameraId(1)));
        scene.add_camera(Camera::new(CameraId(2)));
        assert_eq!(scene.camera_count(), 2);

        assert!(scene.remove_camera(CameraId(1)).is_some());
        assert!(scene.remove_camera(CameraId(1)).is_none());
        assert_eq!(scene.camera_count(), 1);
    }

    #[test]
    fn lights_route_to_their_list() {
        let mut scene = SceneRenderData::new(SceneId(1), 1, 1);
        let point = PointLight {
            position: [0.0; 3],
            radius: 5.0,
            color: LinearRgba::WHITE,
            intensity: 1.0,
        };
        let capsule = CapsuleLight {
            start: [0.0; 3],
            end: [1.0, 0.0, 0.0],
            radius: 2.0,
            color: LinearRgba::WHITE,
            intensity: 1.0,
        };
        scene.add_light(SceneLight::Point(LightId(1), point));
        scene.add_light(SceneLight::Capsule(LightId(2), capsule));
        assert_eq!(scene.point_lights().len(), 1);
        assert_eq!(scene.capsule_lights().len(), 1);

        scene.remove_light(LightId(2)).unwrap();
        assert!(scene.capsule_lights().is_empty());
        assert_eq!(
            scene.remove_light(LightId(2)),
            Err(SceneError::LightNotFound(LightId(2)))
        );
    }

    #[test]
    fn changing_a_light_shape_moves_it_between_lists() {
        let mut scene = SceneRenderData::new(SceneId(1), 1, 1);
        let point = PointLight {
            position: [0.0; 3],
            radius: 5.0,
            color: LinearRgba::WHITE,
            intensity: 1.0,
        };
        let capsule = CapsuleLight {
            start: [0.0; 3],
            end: [0.0, 1.0, 0.0],
            radius: 1.0,
            color: LinearRgba::WHITE,
            intensity: 2.0,
        };
        scene.add_light(SceneLight::Point(LightId(7), point));
        scene.add_light(SceneLight::Capsule(LightId(7), capsule));
        assert!(scene.point_lights().is_empty());
        assert!(scene.capsule_lights().contains(LightId(7)));

        scene.remove_light(LightId(7)).unwrap();
        assert!(scene.point_lights().is_empty());
        assert!(scene.capsule_lights().is_empty());
    }

    #[test]
    fn renderables_require_an_existing_layer() {
        let (mut scene, [a, ..]) = scene_with_layers();
        let mesh = RenderableId(5);
        assert_eq!(
            scene
                .add_renderable(LayerId(42), mesh, ObjectRenderData::new(ObjectId(1)))
                .unwrap_err(),
            SceneError::LayerNotFound(LayerId(42))
        );
        scene
            .add_renderable(a, mesh, ObjectRenderData::new(ObjectId(1)))
            .unwrap();
        assert_eq!(scene.layer(a).unwrap().object_count(), 1);
    }
}
