//! The toolkit's module registry and alias table

use skrf_core::namespace::{Binding, ModuleDecl, NamespaceBuilder, Submodule};
use skrf_core::{
    calibration, constants, frequency, instances, io, math_functions, media, network,
    network_set, plotting, taper, tline_functions, util,
};

use crate::config::Settings;

/// Required modules in load order
pub const REQUIRED: &[(ModuleDecl, Binding)] = &[
    (frequency::MODULE, Binding::Glob),
    (network::MODULE, Binding::Glob),
    (network_set::MODULE, Binding::Glob),
    (media::MODULE, Binding::Qualified),
    (calibration::MODULE, Binding::Glob),
    (util::MODULE, Binding::Glob),
    (plotting::MODULE, Binding::Glob),
    (math_functions::MODULE, Binding::Glob),
    (tline_functions::MODULE, Binding::Glob),
    (io::MODULE, Binding::Glob),
    (constants::MODULE, Binding::Glob),
    (taper::MODULE, Binding::Glob),
    (instances::MODULE, Binding::Glob),
];

#[cfg(feature = "vi")]
const VI: ModuleDecl = skrf_core::vi::MODULE;
#[cfg(not(feature = "vi"))]
const VI: ModuleDecl = ModuleDecl::unavailable("vi", "skrf-core feature `vi`");

#[cfg(feature = "data")]
const DATA: ModuleDecl = skrf_core::data::MODULE;
#[cfg(not(feature = "data"))]
const DATA: ModuleDecl = ModuleDecl::unavailable("data", "skrf-core feature `data`");

/// Optional modules in load order
pub const OPTIONAL: &[(ModuleDecl, Binding)] = &[(VI, Binding::Glob), (DATA, Binding::Qualified)];

/// Short names bound after all re-exports
pub const ALIASES: &[(&str, &str)] = &[
    ("F", "Frequency"),
    ("N", "Network"),
    ("NS", "NetworkSet"),
    ("lat", "load_all_touchstones"),
    ("saf", "save_all_figs"),
];

/// Registry for the full toolkit under `settings`
pub fn toolkit(settings: &Settings) -> NamespaceBuilder {
    let mut builder = NamespaceBuilder::new().corrupt_data_policy(settings.corrupt_data);

    for &(module, binding) in REQUIRED {
        builder = builder.require(module, binding);
    }
    for &(module, binding) in OPTIONAL {
        builder = builder.optional(configured(module, settings), binding);
    }
    for &(alias, target) in ALIASES {
        builder = builder.alias(alias, target);
    }
    builder
}

fn configured(module: ModuleDecl, settings: &Settings) -> ModuleDecl {
    if settings.is_disabled(module.id()) {
        module.without("skrf settings")
    } else {
        module
    }
}
