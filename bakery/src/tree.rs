use std::collections::HashMap;

/// Node for `Tree`
#[derive(Debug)]
pub struct TreeItem<T> {
    /// Id of the item in the tree
    /// This is set when the item is created, and must not be changed afterwards.
    pub id: u32,
    /// Id of the parent item in the tree. None if this is a root.
    pub parent: Option<u32>,
    /// Ids of the children items
    pub children: Vec<u32>,
    /// Content of the tree node
    pub value: T,
}

impl<T> TreeItem<T> {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn parent(&self) -> &Option<u32> {
        &self.parent
    }

    pub fn children(&self) -> &Vec<u32> {
        &self.children
    }

    /// Return id of first and only child.
    ///
    /// Panics if there is not exactly on child.
    pub fn unique_child(&self) -> u32 {
        if let Some(id) = self.children.first() {
            *id
        } else {
            panic!()
        }
    }

    /// Return id of first and only child, or None.
    ///
    /// Panics if there are more than one child.
    pub fn unique_child_or_none(&self) -> Option<u32> {
        let len = self.children.len();
        assert!(len <= 1);
        self.children.first().cloned()
    }
}

/// Tree structure
///
/// Each node in the tree is referenced by a `u32` unique key, which doubles as a stable
/// id for cyclic/back references (template slots, heritance, type instantiations) without
/// needing owning smart pointers.
#[derive(Debug)]
pub struct Tree<T> {
    items: HashMap<u32, TreeItem<T>>,
    next_id: u32,
}

impl<T> Tree<T> {
    pub fn new() -> Tree<T> {
        Tree {
            items: HashMap::new(),
            next_id: 0,
        }
    }

    /// Remove all nodes from the tree. Item id counter is not reset.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Create a new node in the tree and returns its id
    pub fn create_with_parent(&mut self, parent: Option<u32>, value: T) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let item = TreeItem {
            id,
            parent,
            children: Vec::new(),
            value,
        };
        self.items.insert(id, item);
        if let Some(parent) = parent {
            let parent_item = self.items.get_mut(&parent);
            parent_item.unwrap().children.push(id);
        }
        id
    }

    /// Create a new root node in the tree and returns its id
    pub fn create(&mut self, value: T) -> u32 {
        self.create_with_parent(None, value)
    }

    pub fn get_item(&self, id: u32) -> &TreeItem<T> {
        self.items.get(&id).unwrap()
    }

    fn get_item_mut(&mut self, id: u32) -> &mut TreeItem<T> {
        self.items.get_mut(&id).unwrap()
    }

    pub fn get(&self, id: u32) -> &T {
        &self.get_item(id).value
    }

    pub fn get_mut(&mut self, id: u32) -> &mut T {
        &mut self.get_item_mut(id).value
    }

    /// Add a child to a node, and set parent of child node as well.
    ///
    /// Panics if the child already has a parent, or if an id is invalid.
    pub fn child(&mut self, parent_id: u32, child_id: u32) {
        let child = self.get_item_mut(child_id);
        assert!(child.parent.is_none());
        child.parent = Some(parent_id);
        let parent = self.get_item_mut(parent_id);
        parent.children.push(child_id);
    }

    /// Forcibly reparent a node that has already been attached elsewhere. Used by namespace
    /// and include merging, which relocate whole subtrees parsed under one root to live under
    /// another without recreating them.
    pub fn reparent(&mut self, child_id: u32, new_parent_id: u32) {
        if let Some(old_parent) = self.get_item(child_id).parent {
            self.get_item_mut(old_parent)
                .children
                .retain(|&id| id != child_id);
        }
        self.get_item_mut(child_id).parent = Some(new_parent_id);
        self.get_item_mut(new_parent_id).children.push(child_id);
    }

    pub fn children(&self, node: u32) -> &Vec<u32> {
        &self.get_item(node).children
    }

    /// Remove a node from its parent's child list, leaving it parentless. Used after folding a
    /// duplicate namespace's children into its earlier sibling, to drop the now-empty shell.
    pub fn detach(&mut self, child_id: u32) {
        if let Some(parent) = self.get_item(child_id).parent {
            self.get_item_mut(parent).children.retain(|&id| id != child_id);
        }
        self.get_item_mut(child_id).parent = None;
    }

    pub fn unique_child(&self, parent_id: u32) -> u32 {
        self.get_item(parent_id).unique_child()
    }
}
