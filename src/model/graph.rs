//! Instance graphs: arenas of frames.
//!
//! Frames reference each other by [`FrameId`] rather than by pointer, so
//! cyclic and shared substructure is representable without interior
//! mutability. The arena plus a designated root is the unit that flows
//! through the matcher, the network builder, and the store.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{Frame, FrameId, Slot, TypeTag};

/// A frame arena with a designated root element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceGraph {
    root: FrameId,
    frames: HashMap<FrameId, Frame>,
    next_id: u64,
}

impl InstanceGraph {
    /// Create a graph whose root is a fresh frame with the given tag.
    pub fn new(root_tag: TypeTag) -> Self {
        let root = FrameId(0);
        let mut frames = HashMap::new();
        frames.insert(root, Frame::new(root, root_tag));
        Self {
            root,
            frames,
            next_id: 1,
        }
    }

    pub fn root(&self) -> FrameId {
        self.root
    }

    pub fn root_frame(&self) -> &Frame {
        &self.frames[&self.root]
    }

    pub fn root_tag(&self) -> &TypeTag {
        &self.root_frame().tag
    }

    /// Allocate a fresh frame and return its id.
    pub fn add_frame(&mut self, tag: TypeTag) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.frames.insert(id, Frame::new(id, tag));
        id
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(&id)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(&id)
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Set (replace-or-append) a slot on `frame`. No-op if the frame is gone.
    pub fn set_slot(&mut self, frame: FrameId, slot: Slot) {
        if let Some(f) = self.frames.get_mut(&frame) {
            f.set_slot(slot);
        }
    }

    /// Remove a slot from `frame`, returning it if it existed.
    pub fn remove_slot(&mut self, frame: FrameId, property: &super::PropertyId) -> Option<Slot> {
        self.frames.get_mut(&frame)?.remove_slot(property)
    }

    /// Clone the sub-structure reachable from `root` into a standalone graph
    /// rooted there. Frame ids are preserved. `None` if `root` is unknown.
    pub fn subgraph(&self, root: FrameId) -> Option<InstanceGraph> {
        use super::SlotValues;

        self.frames.get(&root)?;
        let mut frames = HashMap::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if frames.contains_key(&id) {
                continue;
            }
            let frame = self.frames.get(&id)?.clone();
            for slot in &frame.slots {
                if let SlotValues::Frames(refs) = &slot.values {
                    stack.extend(refs.iter().copied());
                }
            }
            frames.insert(id, frame);
        }
        let next_id = frames.keys().map(|f| f.0 + 1).max().unwrap_or(1);
        Some(InstanceGraph {
            root,
            frames,
            next_id,
        })
    }
}
