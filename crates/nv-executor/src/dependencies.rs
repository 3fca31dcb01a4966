//! `package.json` dependency planning.
//!
//! Next.js packages are removed and the Vite / React Router stack is added.
//! Component libraries are only added when a file actually used the
//! component they replace.

use nv_core::{DependencyAction, DependencyChange};
use serde_json::{Map, Value};

/// A package the converted project needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    /// Package name.
    pub name: &'static str,
    /// Version range written to the manifest.
    pub version: &'static str,
    /// Belongs in `devDependencies`.
    pub dev: bool,
}

const VITE: Replacement = Replacement {
    name: "vite",
    version: "^5.4.0",
    dev: true,
};
const PLUGIN_REACT: Replacement = Replacement {
    name: "@vitejs/plugin-react",
    version: "^4.3.1",
    dev: true,
};
const REACT_ROUTER: Replacement = Replacement {
    name: "react-router-dom",
    version: "^6.26.0",
    dev: false,
};
const HELMET: Replacement = Replacement {
    name: "react-helmet-async",
    version: "^2.0.5",
    dev: false,
};
const UNPIC: Replacement = Replacement {
    name: "@unpic/react",
    version: "^0.1.14",
    dev: false,
};

const KNOWN: [Replacement; 5] = [VITE, PLUGIN_REACT, REACT_ROUTER, HELMET, UNPIC];

const SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Framework modules seen in the project's sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameworkUsage {
    /// Some file imported `next/head`.
    pub head: bool,
    /// Some file imported `next/image`.
    pub image: bool,
}

impl FrameworkUsage {
    /// Records the framework imports found in `source`.
    pub fn observe(&mut self, source: &str) {
        self.head |= imports_module(source, "next/head");
        self.image |= imports_module(source, "next/image");
    }

    /// Packages the converted project needs, in installation order.
    #[must_use]
    pub fn replacements(self) -> Vec<Replacement> {
        let mut packages = vec![VITE, PLUGIN_REACT, REACT_ROUTER];
        if self.head {
            packages.push(HELMET);
        }
        if self.image {
            packages.push(UNPIC);
        }
        packages
    }
}

fn imports_module(source: &str, module: &str) -> bool {
    source.contains(&format!("'{module}'")) || source.contains(&format!("\"{module}\""))
}

/// Returns `true` for packages that only exist for Next.js.
///
/// # Examples
///
/// ```
/// use nv_executor::is_next_package;
///
/// assert!(is_next_package("next"));
/// assert!(is_next_package("@next/font"));
/// assert!(is_next_package("eslint-config-next"));
/// assert!(!is_next_package("nextra-theme"));
/// assert!(!is_next_package("react"));
/// ```
#[must_use]
pub fn is_next_package(name: &str) -> bool {
    name == "next"
        || name.starts_with("next-")
        || name.starts_with("@next/")
        || name == "eslint-config-next"
}

/// The plan used when no manifest is available.
#[must_use]
pub fn default_plan(usage: FrameworkUsage) -> Vec<DependencyChange> {
    let mut plan = vec![DependencyChange {
        name: "next".to_owned(),
        old_version: None,
        new_version: None,
        action: DependencyAction::Remove,
    }];
    plan.extend(usage.replacements().into_iter().map(add));
    plan
}

/// Plans changes against a parsed manifest.
///
/// Removals come first, sorted by name; additions follow in installation
/// order and skip packages the manifest already lists.
#[must_use]
pub fn plan_for_manifest(manifest: &Value, usage: FrameworkUsage) -> Vec<DependencyChange> {
    let mut removals: Vec<DependencyChange> = SECTIONS
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flat_map(Map::iter)
        .filter(|(name, _)| is_next_package(name))
        .map(|(name, version)| DependencyChange {
            name: name.clone(),
            old_version: version.as_str().map(str::to_owned),
            new_version: None,
            action: DependencyAction::Remove,
        })
        .collect();
    removals.sort_by(|a, b| a.name.cmp(&b.name));
    removals.dedup_by(|a, b| a.name == b.name);

    let additions = usage
        .replacements()
        .into_iter()
        .filter(|package| !lists(manifest, package.name))
        .map(add);

    removals.into_iter().chain(additions).collect()
}

/// Applies `plan` to `manifest` in place.
pub fn apply_plan(manifest: &mut Value, plan: &[DependencyChange]) {
    let Some(object) = manifest.as_object_mut() else {
        return;
    };
    for change in plan {
        match change.action {
            DependencyAction::Remove => {
                for section in SECTIONS {
                    if let Some(deps) = object.get_mut(section).and_then(Value::as_object_mut) {
                        deps.remove(&change.name);
                    }
                }
            }
            DependencyAction::Add | DependencyAction::Update => {
                let dev = KNOWN
                    .iter()
                    .any(|package| package.dev && package.name == change.name);
                let section = if dev { "devDependencies" } else { "dependencies" };
                let entry = object
                    .entry(section)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Some(deps) = entry.as_object_mut() {
                    deps.insert(
                        change.name.clone(),
                        Value::String(change.new_version.clone().unwrap_or_default()),
                    );
                }
            }
        }
    }
}

fn lists(manifest: &Value, name: &str) -> bool {
    SECTIONS.iter().any(|section| {
        manifest
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key(name))
    })
}

fn add(package: Replacement) -> DependencyChange {
    DependencyChange {
        name: package.name.to_owned(),
        old_version: None,
        new_version: Some(package.version.to_owned()),
        action: DependencyAction::Add,
    }
}
