//! File-based route discovery and route tree conversion for nv-migrate.
//!
//! The converter works on file names alone:
//!
//! 1. [`build_source_routes`] indexes layout files, then derives one
//!    [`SourceRoute`](nv_core::SourceRoute) per page file.
//! 2. [`convert_routes`] groups the routes by layout and produces a
//!    [`RouteTree`] of [`RouteObject`](nv_core::RouteObject)s in router
//!    syntax.
//! 3. [`render_route_module`] prints the tree as a `createBrowserRouter`
//!    module.
//!
//! API route files are pages like any other; [`api_endpoints`] also lists
//! them as a separate inventory.
//!
//! # Path Syntax
//!
//! | File segment | Router segment |
//! |--------------|----------------|
//! | `about` | `about` |
//! | `[id]` | `:id` |
//! | `[...slug]` | `*` |
//! | `[[...filters]]` | `*` |

#![deny(clippy::all)]
#![warn(missing_docs)]

mod api;
mod render;
mod segment;
mod source;
mod target;

pub use api::{ApiEndpoint, api_endpoints};
pub use render::render_route_module;
pub use segment::{Segment, router_path};
pub use source::{
    LayoutIndex, ROUTE_EXTENSIONS, build_source_routes, has_route_extension, index_layouts,
    is_api_file, is_layout_file, is_page_file,
};
pub use target::{RouteComponent, RouteTree, component_name, convert_routes, to_target_routes};
