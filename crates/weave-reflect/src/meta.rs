use crate::ModelType;

/// Platform-version metadata keyed by type identity.
///
/// What a "version" means is the host's business; the model layer only passes
/// the lookup through.
pub trait PlatformVersions {
    /// The minimum platform version that ships `ty`, if the host tracks one.
    fn min_version(&self, ty: &ModelType<'_>) -> Option<u32>;
}

/// Binary descriptor strings for interop marshalling.
pub trait DescriptorFormat {
    fn descriptor(&self, ty: &ModelType<'_>) -> String;
}
