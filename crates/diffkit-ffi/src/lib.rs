//! C-ABI boundary for the diffkit engine.
//!
//! The exported names and signatures are the compatibility surface a
//! host binding links against. The calling convention is pointer-based
//! throughout: the host copies document bytes into engine-owned buffers
//! obtained from `get_left_input_ptr` / `get_right_input_ptr`, commits
//! each side, finalizes, and reads the packed result out of linear
//! memory.
//!
//! Pointer stability: anything returned by `finalize`,
//! `batch_resolve_symbols`, or the input-pointer getters is valid only
//! until the next `finalize`, `batch_resolve_symbols`, `commit_*`,
//! `clear_engine`, or `destroy_engine` on the same handle.
//!
//! Every call validates the handle's magic word before touching it, so
//! a stale or foreign pointer degrades to a null/zero/no-op return
//! instead of undefined behavior. `destroy_engine` zeroes the magic,
//! making a double destroy inert.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

use std::ptr;

use diffkit_core::{Engine, EngineConfig};

/// Magic word stamped into every live handle.
const ENGINE_MAGIC: u32 = 0xD1FF_C0DE;

/// Opaque engine handle passed across the boundary.
pub struct EngineHandle {
    magic: u32,
    engine: Engine,
}

fn validate(handle: *mut EngineHandle) -> Option<&'static mut EngineHandle> {
    if handle.is_null() {
        return None;
    }
    let handle = unsafe { &mut *handle };
    (handle.magic == ENGINE_MAGIC).then_some(handle)
}

fn validate_const(handle: *const EngineHandle) -> Option<&'static EngineHandle> {
    if handle.is_null() {
        return None;
    }
    let handle = unsafe { &*handle };
    (handle.magic == ENGINE_MAGIC).then_some(handle)
}

fn boxed(engine: Engine) -> *mut EngineHandle {
    Box::into_raw(Box::new(EngineHandle {
        magic: ENGINE_MAGIC,
        engine,
    }))
}

/// Create an engine sized by the two host-facing limits.
///
/// `max_memory` is advisory; `max_input` is split evenly between the two
/// input buffers. Returns null on allocation failure only.
#[no_mangle]
pub extern "C" fn create_engine(max_memory: u32, max_input: u32) -> *mut EngineHandle {
    boxed(Engine::with_limits(max_memory, max_input))
}

/// Create an engine from a binary configuration blob.
///
/// The blob is the 16-byte little-endian form produced by
/// `EngineConfig::to_bytes`; null or empty input selects the defaults.
/// Returns null when the blob fails to decode.
#[no_mangle]
pub extern "C" fn create_engine_with_config(
    config_ptr: *const u8,
    config_len: u32,
) -> *mut EngineHandle {
    let config = if config_ptr.is_null() || config_len == 0 {
        EngineConfig::default()
    } else {
        let blob = unsafe { std::slice::from_raw_parts(config_ptr, config_len as usize) };
        match EngineConfig::from_bytes(blob) {
            Ok(config) => config,
            Err(_) => return ptr::null_mut(),
        }
    };
    boxed(Engine::new(config))
}

/// Destroy the engine and free all associated memory.
///
/// Safe to call with null or an already-destroyed handle.
#[no_mangle]
pub extern "C" fn destroy_engine(handle: *mut EngineHandle) {
    let Some(valid) = validate(handle) else {
        return;
    };
    // Zero the magic so a second destroy on the same pointer is a no-op.
    valid.magic = 0;
    drop(unsafe { Box::from_raw(handle) });
}

/// Reset the engine for a new session; input buffers stay allocated.
#[no_mangle]
pub extern "C" fn clear_engine(handle: *mut EngineHandle) {
    if let Some(handle) = validate(handle) {
        handle.engine.clear();
    }
}

/// Pointer to the left input buffer; the host may write up to
/// `max_input / 2` bytes.
#[no_mangle]
pub extern "C" fn get_left_input_ptr(handle: *mut EngineHandle) -> *mut u8 {
    match validate(handle) {
        Some(handle) => handle.engine.left_input_mut().as_mut_ptr(),
        None => ptr::null_mut(),
    }
}

/// Pointer to the right input buffer.
#[no_mangle]
pub extern "C" fn get_right_input_ptr(handle: *mut EngineHandle) -> *mut u8 {
    match validate(handle) {
        Some(handle) => handle.engine.right_input_mut().as_mut_ptr(),
        None => ptr::null_mut(),
    }
}

/// Parse the first `len` bytes of the left buffer. Returns 0 on success,
/// -1 on failure (`get_last_error` describes the failure).
#[no_mangle]
pub extern "C" fn commit_left(handle: *mut EngineHandle, len: u32) -> i32 {
    match validate(handle) {
        Some(handle) => match handle.engine.commit_left(len) {
            Ok(()) => 0,
            Err(_) => -1,
        },
        None => -1,
    }
}

/// Parse the first `len` bytes of the right buffer. Returns 0 on
/// success, -1 on failure.
#[no_mangle]
pub extern "C" fn commit_right(handle: *mut EngineHandle, len: u32) -> i32 {
    match validate(handle) {
        Some(handle) => match handle.engine.commit_right(len) {
            Ok(()) => 0,
            Err(_) => -1,
        },
        None => -1,
    }
}

/// Run the comparator and return a pointer to the packed result frame.
///
/// Must follow successful commits on both sides. Returns null only for
/// an invalid handle.
#[no_mangle]
pub extern "C" fn finalize(handle: *mut EngineHandle) -> *const u8 {
    match validate(handle) {
        Some(handle) => handle.engine.finalize().as_ptr(),
        None => ptr::null(),
    }
}

/// Length in bytes of the current result frame.
#[no_mangle]
pub extern "C" fn get_result_len(handle: *const EngineHandle) -> u32 {
    match validate_const(handle) {
        Some(handle) => handle.engine.result_len(),
        None => 0,
    }
}

/// Encode the symbol frame for the current diff entries and return a
/// pointer to it, storing its length in `out_len`.
///
/// Must follow `finalize`. Returns null for an invalid handle or a null
/// `out_len`.
#[no_mangle]
pub extern "C" fn batch_resolve_symbols(handle: *mut EngineHandle, out_len: *mut u32) -> *const u8 {
    if out_len.is_null() {
        return ptr::null();
    }
    match validate(handle) {
        Some(handle) => {
            let frame = handle.engine.resolve_symbols();
            unsafe { *out_len = frame.len() as u32 };
            frame.as_ptr()
        }
        None => ptr::null(),
    }
}

/// Pointer to the UTF-8 message describing the most recent failure, or
/// null when the previous call succeeded. Null-terminated.
#[no_mangle]
pub extern "C" fn get_last_error(handle: *const EngineHandle) -> *const u8 {
    match validate_const(handle) {
        Some(handle) => handle.engine.last_error().as_ptr(),
        None => ptr::null(),
    }
}

/// Length of the last-error message, excluding the null terminator.
#[no_mangle]
pub extern "C" fn get_last_error_len(handle: *const EngineHandle) -> u32 {
    match validate_const(handle) {
        Some(handle) => handle.engine.last_error().len(),
        None => 0,
    }
}

/// Allocate `size` bytes of host-owned scratch memory.
#[no_mangle]
pub extern "C" fn _internal_alloc(size: usize) -> *mut std::ffi::c_void {
    let mut buf = Vec::<u8>::with_capacity(size);
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr.cast()
}

/// Free memory obtained from `_internal_alloc` with the same `size`.
#[no_mangle]
pub extern "C" fn _internal_dealloc(ptr: *mut std::ffi::c_void, size: usize) {
    if !ptr.is_null() {
        drop(unsafe { Vec::from_raw_parts(ptr.cast::<u8>(), 0, size) });
    }
}
