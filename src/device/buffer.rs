//! Device buffers
use crate::types::{Error, Result};

/// How a kernel accesses a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Kernels only read from the buffer
    ReadOnly,
    /// Kernels only write to the buffer
    WriteOnly,
}

/// A buffer of values that lives on a device
///
/// A buffer is owned by the call that creates it and released when it is dropped.
#[derive(Debug)]
pub struct DeviceBuffer<E> {
    data: Vec<E>,
    access_mode: AccessMode,
}

/// Allocate host memory for `len` values, failing instead of aborting when it is not available
pub(crate) fn try_allocate<E>(len: usize) -> Result<Vec<E>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| Error::DeviceBuffer(format!("cannot allocate {len} values: {e}")))?;
    Ok(data)
}

impl<E: Copy + Send + Sync> DeviceBuffer<E> {
    /// Create a buffer that takes ownership of host data
    pub fn from_vec(data: Vec<E>, access_mode: AccessMode) -> Self {
        Self { data, access_mode }
    }

    /// Create a buffer holding a copy of host data
    pub fn from_slice(data: &[E], access_mode: AccessMode) -> Result<Self> {
        let mut buffer = try_allocate(data.len())?;
        buffer.extend_from_slice(data);
        Ok(Self::from_vec(buffer, access_mode))
    }

    /// Create a zero initialised buffer
    pub fn zeros(len: usize, access_mode: AccessMode) -> Result<Self>
    where
        E: num::Zero,
    {
        let mut buffer = try_allocate(len)?;
        buffer.resize(len, E::zero());
        Ok(Self::from_vec(buffer, access_mode))
    }

    /// The number of values in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Is the buffer empty?
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The access mode of the buffer
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Read access for kernels
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    /// Write access for kernels
    ///
    /// Fails for read-only buffers.
    pub fn as_mut_slice(&mut self) -> Result<&mut [E]> {
        match self.access_mode {
            AccessMode::WriteOnly => Ok(&mut self.data),
            AccessMode::ReadOnly => Err(Error::DeviceBuffer(
                "cannot write to a read-only buffer".to_string(),
            )),
        }
    }

    /// Copy the contents of the buffer to the host
    pub fn host_copy(&self) -> Vec<E> {
        self.data.clone()
    }
}
