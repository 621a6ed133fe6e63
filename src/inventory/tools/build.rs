use std::collections::HashMap;

use tracing::debug;

use crate::inventory::tools::model::{HostRecord, HostVars, InventoryTree};

/// Options applied to every host folded into the tree.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub default_user: String,
    /// Place records carrying a group under `children[group]`.
    pub grouping: bool,
    /// Emit the prefix length as a host variable.
    pub expose_mask: bool,
}

/// Incrementally folds accepted records into an [`InventoryTree`].
///
/// Records must be inserted in row order. A host name lives in exactly one
/// place: inserting a name again replaces the earlier variables wholesale,
/// and moves the host when its group changed.
#[derive(Debug)]
pub struct InventoryBuilder {
    options: BuildOptions,
    tree: InventoryTree,
    placements: HashMap<String, Option<String>>,
}

impl InventoryBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            tree: InventoryTree::default(),
            placements: HashMap::new(),
        }
    }

    pub fn insert(&mut self, record: HostRecord) {
        let vars = self.host_vars(&record);
        let group = if self.options.grouping {
            record.group
        } else {
            None
        };

        if let Some(previous) = self.placements.get(&record.name) {
            if *previous != group {
                let previous = previous.clone();
                self.remove_from(&record.name, previous.as_deref());
            } else {
                debug!(host = %record.name, "overwriting duplicate host");
            }
        }

        let hosts = match &group {
            Some(group) => {
                &mut self
                    .tree
                    .children
                    .entry(group.clone())
                    .or_default()
                    .hosts
            }
            None => &mut self.tree.hosts,
        };
        hosts.insert(record.name.clone(), vars);
        self.placements.insert(record.name, group);
    }

    pub fn finish(self) -> InventoryTree {
        self.tree
    }

    fn host_vars(&self, record: &HostRecord) -> HostVars {
        HostVars {
            ansible_host: record.address.clone(),
            ansible_user: self.options.default_user.clone(),
            hostname: record.hostname.clone(),
            ansible_prefix_length: if self.options.expose_mask {
                record.prefix_length
            } else {
                None
            },
        }
    }

    fn remove_from(&mut self, name: &str, group: Option<&str>) {
        debug!(host = %name, from = ?group, "moving duplicate host");
        match group {
            Some(group) => {
                let emptied = match self.tree.children.get_mut(group) {
                    Some(child) => {
                        child.hosts.shift_remove(name);
                        child.hosts.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    self.tree.children.shift_remove(group);
                }
            }
            None => {
                self.tree.hosts.shift_remove(name);
            }
        }
    }
}

/// Folds `records` in iteration order.
pub fn build_inventory<I>(records: I, options: BuildOptions) -> InventoryTree
where
    I: IntoIterator<Item = HostRecord>,
{
    let mut builder = InventoryBuilder::new(options);
    for record in records {
        builder.insert(record);
    }
    builder.finish()
}
