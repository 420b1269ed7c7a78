//! Bump allocator with chained pages (§4.A).
//!
//! Every per-draw allocation (the post-VS cache, varying slabs, clipped
//! polygon workspaces, assembled primitive arrays) comes from a single
//! [`Arena`] owned by the [`Context`](crate::context::Context). The whole
//! arena is released in one shot by [`Arena::reset`] at the end of a draw
//! call; no pointer handed out before a `reset` may be used after it.

use std::cell::UnsafeCell;

const MIN_PAGE_SIZE: usize = 64 * 1024;

struct Page {
    data: UnsafeCell<Box<[u8]>>,
    offset: usize,
}

impl Page {
    fn new(capacity: usize) -> Self {
        Self {
            data: UnsafeCell::new(vec![0u8; capacity].into_boxed_slice()),
            offset: 0,
        }
    }

    fn capacity(&self) -> usize {
        unsafe { (&*self.data.get()).len() }
    }
}

/// A bump allocator backed by a linked list of fixed-capacity pages.
///
/// `alloc` bumps the current page's offset after 8-byte alignment. If the
/// current page lacks room, a new page is pushed whose capacity is the
/// smallest power-of-two page size `>= max(current page size, n)`. `reset`
/// frees every page but the first, zeros the first page's offset, and (if
/// the prior total usage exceeded the first page's capacity) grows the
/// first page to fit the high-water mark.
pub struct Arena {
    pages: Vec<Page>,
    high_water: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(MIN_PAGE_SIZE)],
            high_water: 0,
        }
    }

    /// Allocate `n` bytes, 8-byte aligned, zero-initialized is not
    /// guaranteed (see [`Arena::calloc`] for that).
    ///
    /// # Safety
    ///
    /// The returned slice is only valid until the next call to
    /// [`Arena::reset`]. The caller must not retain it past that point.
    pub unsafe fn alloc(&mut self, n: usize) -> *mut u8 {
        if n == 0 {
            // Still return a valid, non-null, well-aligned pointer.
            return self.ensure_room(8);
        }
        self.ensure_room(n)
    }

    /// Allocate `n` zeroed bytes.
    ///
    /// # Safety
    ///
    /// Same lifetime contract as [`Arena::alloc`].
    pub unsafe fn calloc(&mut self, n: usize) -> *mut u8 {
        let ptr = self.alloc(n);
        if n > 0 {
            std::ptr::write_bytes(ptr, 0, n);
        }
        ptr
    }

    fn ensure_room(&mut self, n: usize) -> *mut u8 {
        let page_idx = self.pages.len() - 1;
        let page = &self.pages[page_idx];
        let aligned = align8(page.offset);
        if aligned + n <= page.capacity() {
            let page = &mut self.pages[page_idx];
            page.offset = aligned + n;
            let base = unsafe { (*page.data.get()).as_mut_ptr() };
            return unsafe { base.add(aligned) };
        }

        // Need a fresh page. Its size doubles (power-of-two growth) until
        // it is large enough to hold this allocation.
        let mut new_cap = page.capacity().max(MIN_PAGE_SIZE);
        while new_cap < n {
            new_cap = new_cap
                .checked_mul(2)
                .unwrap_or_else(|| oom("arena page size overflow"));
        }
        self.pages.push(Page::new(new_cap));
        let new_page = self.pages.last_mut().unwrap();
        new_page.offset = n;
        unsafe { (*new_page.data.get()).as_mut_ptr() }
    }

    /// Release every page allocated since the first, zero the first page's
    /// cursor, and grow the first page if the previous draw's usage
    /// exceeded its capacity. Every pointer obtained from `alloc`/`calloc`
    /// since the last reset is now dangling and must not be dereferenced.
    pub fn reset(&mut self) {
        let used: usize = self.pages.iter().map(|p| p.offset).sum();
        self.high_water = self.high_water.max(used);

        let first_cap = self.pages[0].capacity();
        self.pages.truncate(1);
        self.pages[0].offset = 0;

        if self.high_water > first_cap {
            let mut new_cap = first_cap.max(MIN_PAGE_SIZE);
            while new_cap < self.high_water {
                new_cap = new_cap
                    .checked_mul(2)
                    .unwrap_or_else(|| oom("arena page size overflow"));
            }
            self.pages[0] = Page::new(new_cap);
        }
    }

    /// Offset of the first page's cursor. Used by tests to verify the
    /// arena-reset invariant (§8).
    #[cfg(test)]
    pub(crate) fn first_page_offset(&self) -> usize {
        self.pages[0].offset
    }

    #[cfg(test)]
    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn align8(offset: usize) -> usize {
    (offset + 7) & !7
}

#[cold]
fn oom(msg: &str) -> ! {
    eprintln!("rasterrs: out of memory: {msg}");
    std::process::abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_is_aligned_and_in_bounds() {
        let mut arena = Arena::new();
        for n in [1usize, 3, 7, 8, 9, 100] {
            let ptr = unsafe { arena.alloc(n) };
            assert_eq!(ptr as usize % 8, 0);
        }
    }

    #[test]
    fn reset_returns_offset_to_zero() {
        let mut arena = Arena::new();
        unsafe {
            arena.alloc(128);
            arena.alloc(256);
        }
        assert!(arena.first_page_offset() > 0);
        arena.reset();
        assert_eq!(arena.first_page_offset(), 0);
    }

    #[test]
    fn overflow_allocates_new_page() {
        let mut arena = Arena::new();
        unsafe {
            arena.alloc(MIN_PAGE_SIZE + 1);
        }
        assert_eq!(arena.page_count(), 2);
    }

    #[test]
    fn reset_grows_first_page_to_high_water_mark() {
        let mut arena = Arena::new();
        unsafe {
            arena.alloc(MIN_PAGE_SIZE * 4);
        }
        assert_eq!(arena.page_count(), 2);
        arena.reset();
        assert_eq!(arena.page_count(), 1);
        assert!(arena.pages[0].capacity() >= MIN_PAGE_SIZE * 4);
    }

    #[test]
    fn data_survives_until_reset() {
        let mut arena = Arena::new();
        unsafe {
            let ptr = arena.alloc(8) as *mut u64;
            *ptr = 0xdead_beef;
            assert_eq!(*ptr, 0xdead_beef);
        }
    }
}
