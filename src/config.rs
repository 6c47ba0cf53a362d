/// 元素个数未知时缓冲区的初始容量。
pub(crate) const DEFAULT_CAPACITY: usize = 16;

/// 按大小提示预分配缓冲区时的容量上限，超出部分按需增长。
pub(crate) const MAX_PRESIZE: usize = 1 << 16;

/// 根据上游给出的大小提示计算缓冲区初始容量。
#[inline]
pub(crate) fn capacity_for(size: Option<usize>) -> usize {
    size.map_or(DEFAULT_CAPACITY, |size| size.min(MAX_PRESIZE))
}
