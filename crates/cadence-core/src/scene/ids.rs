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

//! Producer-allocated handles for scene entities.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! scene_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Allocates a fresh, process-unique handle. Safe to call from any thread.
            pub fn allocate() -> Self {
                static NEXT: AtomicU64 = AtomicU64::new(1);
                Self(NEXT.fetch_add(1, Ordering::Relaxed))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

scene_handle!(
    /// Identifies one [`SceneRenderData`](super::SceneRenderData).
    SceneId
);
scene_handle!(
    /// Identifies a layer within a scene.
    LayerId
);
scene_handle!(
    /// Identifies a camera within a scene.
    CameraId
);
scene_handle!(
    /// Identifies a renderable (a drawable asset that may be instanced).
    RenderableId
);
scene_handle!(
    /// Identifies one object instance of a renderable.
    ObjectId
);
scene_handle!(
    /// Identifies a point or capsule light within a scene.
    LightId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn allocation_is_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| (0..250).map(|_| LayerId::allocate()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate handle {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn display_includes_kind() {
        assert_eq!(SceneId(7).to_string(), "SceneId#7");
    }
}
