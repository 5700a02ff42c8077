// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Read-only `use` instance trees.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::element::Element;
use crate::tree::WeakNode;

/// A node of a `use` instance tree.
///
/// Mirrors a referenced element. Instances never modify
/// the elements they correspond to.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

struct InstanceData {
    element: WeakNode,
    use_element: WeakNode,
    parent: Weak<InstanceData>,
    previous: RefCell<Weak<InstanceData>>,
    next: RefCell<Weak<InstanceData>>,
    children: OnceCell<InstanceList>,
}

impl Instance {
    pub(crate) fn new_root(element: &Element, use_element: &Element) -> Self {
        Instance::new(element, use_element.node().downgrade(), Weak::new())
    }

    fn new(element: &Element, use_element: WeakNode, parent: Weak<InstanceData>) -> Self {
        Instance(Rc::new(InstanceData {
            element: element.node().downgrade(),
            use_element,
            parent,
            previous: RefCell::new(Weak::new()),
            next: RefCell::new(Weak::new()),
            children: OnceCell::new(),
        }))
    }

    /// Returns the element this instance mirrors.
    ///
    /// `None` when the element was dropped.
    pub fn corresponding_element(&self) -> Option<Element> {
        self.0.element.upgrade().and_then(Element::new)
    }

    /// Returns the `use` element that owns the instance tree.
    pub fn corresponding_use_element(&self) -> Option<Element> {
        self.0.use_element.upgrade().and_then(Element::new)
    }

    /// Returns the parent instance. `None` for a root.
    pub fn parent_node(&self) -> Option<Instance> {
        self.0.parent.upgrade().map(Instance)
    }

    /// Returns the previous sibling instance.
    pub fn previous_sibling(&self) -> Option<Instance> {
        self.0.previous.borrow().upgrade().map(Instance)
    }

    /// Returns the next sibling instance.
    pub fn next_sibling(&self) -> Option<Instance> {
        self.0.next.borrow().upgrade().map(Instance)
    }

    /// Returns child instances.
    ///
    /// Built on first access. An instance of a `use` element has a single
    /// child: the instance root of that `use`, shared rather than copied.
    pub fn child_nodes(&self) -> InstanceList {
        self.0.children.get_or_init(|| self.build_children()).clone()
    }

    /// Returns the first child instance.
    pub fn first_child(&self) -> Option<Instance> {
        self.child_nodes().first()
    }

    /// Returns the last child instance.
    pub fn last_child(&self) -> Option<Instance> {
        self.child_nodes().last()
    }

    /// Checks that both handles point to the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn build_children(&self) -> InstanceList {
        let element = match self.corresponding_element() {
            Some(v) => v,
            None => return InstanceList::default(),
        };

        if let Some(link) = element.as_use() {
            return InstanceList(link.instance_root().into_iter().collect());
        }

        let parent = Rc::downgrade(&self.0);
        let children: Vec<Instance> = element.children()
            .map(|child| Instance::new(&child, self.0.use_element.clone(), parent.clone()))
            .collect();

        for pair in children.windows(2) {
            *pair[0].0.next.borrow_mut() = Rc::downgrade(&pair[1].0);
            *pair[1].0.previous.borrow_mut() = Rc::downgrade(&pair[0].0);
        }

        InstanceList(children)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Instance({:?})", self.corresponding_element())
    }
}


/// A list of sibling instances.
#[derive(Clone, Default, Debug)]
pub struct InstanceList(Vec<Instance>);

impl InstanceList {
    /// Returns the number of instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an instance at index. Valid indexes are `0..len`.
    pub fn item(&self, index: usize) -> Option<Instance> {
        self.0.get(index).cloned()
    }

    /// Returns the first instance.
    pub fn first(&self) -> Option<Instance> {
        self.0.first().cloned()
    }

    /// Returns the last instance.
    pub fn last(&self) -> Option<Instance> {
        self.0.last().cloned()
    }

    /// Returns an iterator over instances.
    pub fn iter(&self) -> std::slice::Iter<Instance> {
        self.0.iter()
    }
}
