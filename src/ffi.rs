//! Documentation for the C API
use crate::context::{AddrContext, DeviceCaps, Generation};
use crate::modes::{ResourceType, SwizzleMode};
use crate::surface::{SurfaceDescription, SurfaceFlags};

fn generation(value: u32) -> Option<Generation> {
    match value {
        0 => Some(Generation::Gfx10),
        1 => Some(Generation::Gfx10_3),
        _ => None,
    }
}

fn resource(value: u32) -> Option<ResourceType> {
    match value {
        1 => Some(ResourceType::Tex1d),
        2 => Some(ResourceType::Tex2d),
        3 => Some(ResourceType::Tex3d),
        _ => None,
    }
}

fn swizzle_mode(value: u32) -> Option<SwizzleMode> {
    SwizzleMode::ALL.get(value as usize).copied()
}

fn description(
    resource_type: u32,
    width: u32,
    height: u32,
    depth: u32,
    num_mips: u32,
    num_samples: u32,
    bpp: u32,
    mode: u32,
) -> Option<SurfaceDescription> {
    Some(SurfaceDescription {
        resource: resource(resource_type)?,
        width,
        height,
        depth,
        num_mips,
        num_samples,
        bpp,
        swizzle_mode: swizzle_mode(mode)?,
        custom_pitch: None,
        custom_height: None,
        flags: SurfaceFlags::default(),
    })
}

/// Creates an addressing context. See the safe alternative
/// [AddrContext::new].
///
/// `generation` is 0 for gfx10 and 1 for gfx10.3. Returns null for invalid
/// capability encodings.
///
/// # Safety
/// The returned pointer must be released with [rdna_addr_context_destroy].
#[no_mangle]
pub extern "C" fn rdna_addr_context_create(
    generation_value: u32,
    pipes_log2: u32,
    pipe_interleave_log2: u32,
) -> *mut AddrContext {
    let generation = match generation(generation_value) {
        Some(g) => g,
        None => return core::ptr::null_mut(),
    };
    match AddrContext::new(DeviceCaps {
        generation,
        pipes_log2,
        pipe_interleave_log2,
    }) {
        Ok(context) => Box::into_raw(Box::new(context)),
        Err(_) => core::ptr::null_mut(),
    }
}

/// Releases a context created by [rdna_addr_context_create].
///
/// # Safety
/// `context` must be a pointer previously returned by
/// [rdna_addr_context_create] that has not been destroyed yet. Passing null
/// is allowed and does nothing.
#[no_mangle]
pub unsafe extern "C" fn rdna_addr_context_destroy(context: *mut AddrContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

/// Computes the total byte size of a surface. See the safe alternative
/// [AddrContext::compute_surface_info](AddrContext::compute_surface_info).
///
/// Returns 0 for invalid descriptions.
///
/// # Safety
/// `context` must be a live pointer from [rdna_addr_context_create].
/// `resource_type` uses 1/2/3 for 1D/2D/3D and `mode` indexes
/// [SwizzleMode::ALL].
#[no_mangle]
pub unsafe extern "C" fn rdna_addr_surface_size(
    context: *const AddrContext,
    resource_type: u32,
    width: u32,
    height: u32,
    depth: u32,
    num_mips: u32,
    num_samples: u32,
    bpp: u32,
    mode: u32,
) -> u64 {
    let context = &*context;
    let desc = match description(
        resource_type,
        width,
        height,
        depth,
        num_mips,
        num_samples,
        bpp,
        mode,
    ) {
        Some(desc) => desc,
        None => return 0,
    };
    context
        .compute_surface_info(&desc)
        .map(|layout| layout.surf_size)
        .unwrap_or(0)
}

/// Computes the byte address of a texel. See the safe alternative
/// [AddrContext::surface_addr_from_coord](AddrContext::surface_addr_from_coord).
///
/// Returns `u64::MAX` for invalid descriptions or coordinates outside the
/// surface.
///
/// # Safety
/// `context` must be a live pointer from [rdna_addr_context_create].
#[no_mangle]
pub unsafe extern "C" fn rdna_addr_surface_addr_from_coord(
    context: *const AddrContext,
    resource_type: u32,
    width: u32,
    height: u32,
    depth: u32,
    num_mips: u32,
    num_samples: u32,
    bpp: u32,
    mode: u32,
    mip: u32,
    x: u32,
    y: u32,
    slice: u32,
    sample: u32,
) -> u64 {
    let context = &*context;
    let desc = match description(
        resource_type,
        width,
        height,
        depth,
        num_mips,
        num_samples,
        bpp,
        mode,
    ) {
        Some(desc) => desc,
        None => return u64::MAX,
    };
    let layout = match context.compute_surface_info(&desc) {
        Ok(layout) => layout,
        Err(_) => return u64::MAX,
    };
    if mip >= num_mips
        || x >= (desc.width >> mip).max(1)
        || y >= (desc.height >> mip).max(1)
        || slice >= layout.num_slices
        || sample >= num_samples
    {
        return u64::MAX;
    }
    context
        .surface_addr_from_coord(&desc, &layout, mip, x, y, slice, sample)
        .unwrap_or(u64::MAX)
}
