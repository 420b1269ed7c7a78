//! Opaque-typed vertex/index buffers (§4.C).

/// The element-type tag of an [`IndexBuffer`] (§3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexType {
    U8,
    U16,
    U32,
    U64,
}

impl IndexType {
    #[inline]
    fn size(self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
            IndexType::U64 => 8,
        }
    }
}

/// A contiguous byte blob plus `bytes_per_vertex`. The pipeline never
/// interprets the contents of a vertex buffer — only the user's vertex
/// closure does.
///
/// Invariant: `data.len() % bytes_per_vertex == 0`.
pub struct VertexBuffer {
    data: Vec<u8>,
    bytes_per_vertex: usize,
}

impl VertexBuffer {
    /// Copies `data` in, tagging it with `bytes_per_vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() % bytes_per_vertex != 0` or
    /// `bytes_per_vertex == 0` — this is a programmer error at buffer
    /// construction time, not a draw-time recoverable condition.
    pub fn copy_data(bytes_per_vertex: usize, data: &[u8]) -> Self {
        assert!(bytes_per_vertex > 0, "bytes_per_vertex must be nonzero");
        assert_eq!(
            data.len() % bytes_per_vertex,
            0,
            "vertex buffer length {} is not a multiple of bytes_per_vertex {}",
            data.len(),
            bytes_per_vertex
        );
        Self {
            data: data.to_vec(),
            bytes_per_vertex,
        }
    }

    #[inline]
    pub fn bytes_per_vertex(&self) -> usize {
        self.bytes_per_vertex
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.bytes_per_vertex
    }

    /// Returns a pointer to the start of vertex `i`'s bytes, or `None` if
    /// `i` is out of range.
    #[inline]
    pub fn index_vertex(&self, i: u64) -> Option<&[u8]> {
        let start = (i as usize).checked_mul(self.bytes_per_vertex)?;
        let end = start.checked_add(self.bytes_per_vertex)?;
        self.data.get(start..end)
    }
}

/// A contiguous byte blob plus an element-type tag (§3).
pub struct IndexBuffer {
    data: Vec<u8>,
    elem_type: IndexType,
}

impl IndexBuffer {
    /// Copies `data` in, tagging it with `elem_type`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of the element size.
    pub fn copy_data(elem_type: IndexType, data: &[u8]) -> Self {
        let sz = elem_type.size();
        assert_eq!(
            data.len() % sz,
            0,
            "index buffer length {} is not a multiple of element size {}",
            data.len(),
            sz
        );
        Self {
            data: data.to_vec(),
            elem_type,
        }
    }

    #[inline]
    pub fn elem_type(&self) -> IndexType {
        self.elem_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.elem_type.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads index `i`, widened to `u64`, or `None` if out of range.
    #[inline]
    pub fn index_index(&self, i: usize) -> Option<u64> {
        let sz = self.elem_type.size();
        let start = i.checked_mul(sz)?;
        let bytes = self.data.get(start..start + sz)?;
        Some(match self.elem_type {
            IndexType::U8 => bytes[0] as u64,
            IndexType::U16 => u16::from_le_bytes(bytes.try_into().unwrap()) as u64,
            IndexType::U32 => u32::from_le_bytes(bytes.try_into().unwrap()) as u64,
            IndexType::U64 => u64::from_le_bytes(bytes.try_into().unwrap()),
        })
    }
}
