//! Power-of-two ring buffer geometry.
//!
//! All cursor arithmetic masks with `N - 1`. One slot is sacrificed so that
//! `head == tail` always means empty; usable capacity is `N - 1`.

use core::cell::UnsafeCell;

/// Wrap `x` into `0..N`. `N` must be a power of two.
#[inline(always)]
pub const fn mask<const N: usize>(x: usize) -> usize {
    x & (N - 1)
}

/// Length of the contiguous run starting at `tail` that does not cross the
/// physical end of an `N`-byte buffer.
#[inline(always)]
pub const fn contiguous_run<const N: usize>(head: usize, tail: usize) -> usize {
    if head >= tail { head - tail } else { N - tail }
}

/// Byte ring with producer and consumer cursors.
///
/// The storage sits in an [`UnsafeCell`] because a DMA channel reads it
/// behind the compiler's back once a chunk has been handed over.
pub struct RingBuffer<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    head: usize,
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Compile-time check that `N` is a power of two no smaller than 2.
    pub(crate) const POWER_OF_TWO: () = assert!(
        N >= crate::internal::constants::MIN_RING_SIZE && N.is_power_of_two(),
        "ring size must be a power of two >= 2"
    );

    /// Usable capacity (`N - 1`)
    pub const CAPACITY: usize = N - 1;

    /// Create an empty ring
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::POWER_OF_TWO;
        Self {
            buf: UnsafeCell::new([0; N]),
            head: 0,
            tail: 0,
        }
    }

    /// Next write slot
    #[inline(always)]
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Oldest unconsumed slot
    #[inline(always)]
    pub const fn tail(&self) -> usize {
        self.tail
    }

    /// Number of stored bytes
    #[inline(always)]
    pub const fn len(&self) -> usize {
        mask::<N>(self.head.wrapping_sub(self.tail))
    }

    /// Free slots
    #[inline(always)]
    pub const fn free(&self) -> usize {
        Self::CAPACITY - self.len()
    }

    /// `head == tail`
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// One free slot left (the sacrificed one)
    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        mask::<N>(self.head + 1) == self.tail
    }

    /// Append one byte. Returns `false` (and stores nothing) when full.
    pub fn push(&mut self, byte: u8) -> bool {
        let next = mask::<N>(self.head + 1);
        if next == self.tail {
            return false;
        }
        // SAFETY: head < N; the slot at head is never part of an in-flight chunk
        unsafe { self.buf.get().cast::<u8>().add(self.head).write_volatile(byte) };
        self.head = next;
        true
    }

    /// Contiguous readable run starting at `tail`
    #[inline(always)]
    pub const fn contiguous_len(&self) -> usize {
        contiguous_run::<N>(self.head, self.tail)
    }

    /// Advance `tail` past `count` consumed bytes
    #[inline(always)]
    pub fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.len());
        self.tail = mask::<N>(self.tail + count);
    }

    /// Address of the byte at `tail`, for handing to DMA
    #[inline(always)]
    pub fn tail_ptr(&self) -> *const u8 {
        // SAFETY: tail < N, so the offset stays inside the array
        unsafe { self.buf.get().cast::<u8>().add(self.tail).cast_const() }
    }

    /// Byte at physical slot `index` (masked)
    #[inline(always)]
    pub fn get(&self, index: usize) -> u8 {
        // SAFETY: index masked into bounds; volatile because DMA may be reading
        // neighbouring bytes and the compiler must not cache the array
        unsafe { self.buf.get().cast::<u8>().add(mask::<N>(index)).read_volatile() }
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
