//! Aligned device buffers
//!
//! Buffers are addressed as `u64` throughout the engine; kernels cast to
//! typed pointers once a specialization has been selected. Allocation failure
//! is reported synchronously, before any task is submitted. Release of a
//! buffer that a running task may still read must itself be a scheduled task:
//! move the buffer into a cleanup closure that depends on the compute event.

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::alloc::{alloc_zeroed, dealloc, Layout as AllocLayout};

/// Alignment of every device allocation (wide vector load friendly)
const DEVICE_ALLOC_ALIGN: usize = 64;

/// An owned, aligned allocation addressed as a raw `u64`
///
/// Dropping the buffer deallocates it; scheduled release is expressed by
/// transferring ownership into a dependency-ordered cleanup task.
#[derive(Debug)]
pub struct DeviceBuffer {
    ptr: u64,
    size_bytes: usize,
}

impl DeviceBuffer {
    /// Allocate a zero-initialized buffer of `len` elements of `dtype`
    pub fn alloc(len: usize, dtype: DType) -> Result<Self> {
        let size_bytes = len * dtype.size_in_bytes();
        if size_bytes == 0 {
            return Ok(Self {
                ptr: 0,
                size_bytes: 0,
            });
        }
        let layout = AllocLayout::from_size_align(size_bytes, DEVICE_ALLOC_ALIGN)
            .map_err(|e| Error::Backend(e.to_string()))?;
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(Error::OutOfMemory { size: size_bytes });
        }
        log::trace!("alloc: {size_bytes} bytes at {:#x}", ptr as u64);
        Ok(Self {
            ptr: ptr as u64,
            size_bytes,
        })
    }

    /// Allocate a buffer holding a copy of `data`
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        let buf = Self::alloc(data.len(), T::DTYPE)?;
        if !data.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(data);
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.ptr as *mut u8, bytes.len());
            }
        }
        Ok(buf)
    }

    /// Copy the buffer contents back to the host as a typed vector
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        let len = self.size_bytes / std::mem::size_of::<T>();
        let mut out = vec![T::zero(); len];
        if len > 0 {
            unsafe {
                std::ptr::copy_nonoverlapping(
                    self.ptr as *const u8,
                    out.as_mut_ptr() as *mut u8,
                    len * std::mem::size_of::<T>(),
                );
            }
        }
        out
    }

    /// Base address of the allocation
    #[inline]
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Allocation size in bytes
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of elements of `dtype` the buffer holds
    #[inline]
    pub fn len_for(&self, dtype: DType) -> usize {
        self.size_bytes / dtype.size_in_bytes()
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        if self.ptr == 0 || self.size_bytes == 0 {
            return;
        }
        log::trace!("free: {} bytes at {:#x}", self.size_bytes, self.ptr);
        let layout = AllocLayout::from_size_align(self.size_bytes, DEVICE_ALLOC_ALIGN)
            .expect("allocation layout was validated at alloc time");
        unsafe {
            dealloc(self.ptr as *mut u8, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data = [1.5f32, -2.0, 0.0, 42.0];
        let buf = DeviceBuffer::from_slice(&data).unwrap();
        assert_eq!(buf.to_vec::<f32>(), data);
        assert_eq!(buf.len_for(DType::F32), 4);
    }

    #[test]
    fn test_zero_initialized() {
        let buf = DeviceBuffer::alloc(16, DType::I32).unwrap();
        assert_eq!(buf.to_vec::<i32>(), vec![0i32; 16]);
    }

    #[test]
    fn test_empty_allocation() {
        let buf = DeviceBuffer::alloc(0, DType::F64).unwrap();
        assert_eq!(buf.ptr(), 0);
        assert!(buf.to_vec::<f64>().is_empty());
    }

    #[test]
    fn test_alignment() {
        let buf = DeviceBuffer::alloc(3, DType::U8).unwrap();
        assert_eq!(buf.ptr() % DEVICE_ALLOC_ALIGN as u64, 0);
    }
}
