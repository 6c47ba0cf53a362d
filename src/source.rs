use std::iter::Peekable;

/// 数据源，一次终止操作中元素的唯一生产者。
///
/// 数据源只能被遍历一次：`has_next`为`false`之后不能再调用`next`，每个元素只会被生产一次。
pub trait Source {
    type Item;

    /// 剩余元素个数，未知时返回`None`。
    fn size_if_known(&self) -> Option<usize>;

    /// 是否还有下一个元素。
    fn has_next(&mut self) -> bool;

    /// 生产下一个元素，必须在`has_next`返回`true`之后调用。
    fn next(&mut self) -> Self::Item;
}

#[cold]
#[track_caller]
fn exhausted() -> ! {
    panic!("Source::next called after the source was exhausted")
}

/// 固定元素列表。
#[derive(Debug)]
pub struct List<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> List<T> {
    pub fn new(elements: Vec<T>) -> Self {
        List { elements: elements.into_iter() }
    }
}

impl<T> Source for List<T> {
    type Item = T;

    fn size_if_known(&self) -> Option<usize> {
        Some(self.elements.len())
    }

    fn has_next(&mut self) -> bool {
        !self.elements.as_slice().is_empty()
    }

    fn next(&mut self) -> T {
        self.elements.next().unwrap_or_else(|| exhausted())
    }
}

/// 基于切片的数据源，逐个克隆元素。
#[derive(Debug)]
pub struct Slice<'s, T> {
    slice: &'s [T],
    current: usize,
}

impl<'s, T> Slice<'s, T> {
    pub fn new(slice: &'s [T]) -> Self {
        Slice { slice, current: 0 }
    }
}

impl<T: Clone> Source for Slice<'_, T> {
    type Item = T;

    fn size_if_known(&self) -> Option<usize> {
        Some(self.slice.len() - self.current)
    }

    fn has_next(&mut self) -> bool {
        self.current < self.slice.len()
    }

    fn next(&mut self) -> T {
        let element = self.slice.get(self.current).unwrap_or_else(|| exhausted()).clone();
        self.current += 1;
        element
    }
}

/// 任意迭代器，向前多看一个元素以实现`has_next`。
pub struct Iter<I: Iterator> {
    iter: Peekable<I>,
}

impl<I: Iterator> Iter<I> {
    pub fn new(iter: I) -> Self {
        Iter { iter: iter.peekable() }
    }
}

impl<I: Iterator> Source for Iter<I> {
    type Item = I::Item;

    fn size_if_known(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        }
    }

    fn has_next(&mut self) -> bool {
        self.iter.peek().is_some()
    }

    fn next(&mut self) -> I::Item {
        self.iter.next().unwrap_or_else(|| exhausted())
    }
}

/// 区间端点，支持比较与按步长前进，使同一套区间逻辑适用于各种宽度的整数。
pub trait Endpoint: Copy + Ord {
    const ONE: Self;
    const MAX: Self;

    /// 前进一个步长，溢出时返回`None`。
    fn add_step(self, step: Self) -> Option<Self>;

    fn is_negative(self) -> bool;
}

macro_rules! signed_endpoint {
    ($($t:ty),*) => {$(
        impl Endpoint for $t {
            const ONE: Self = 1;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn add_step(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }

            #[inline]
            fn is_negative(self) -> bool {
                self < 0
            }
        }
    )*};
}

macro_rules! unsigned_endpoint {
    ($($t:ty),*) => {$(
        impl Endpoint for $t {
            const ONE: Self = 1;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn add_step(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }

            #[inline]
            fn is_negative(self) -> bool {
                false
            }
        }
    )*};
}

signed_endpoint!(i8, i16, i32, i64, i128, isize);
unsigned_endpoint!(u8, u16, u32, u64, u128, usize);

/// 左闭右开的等差区间：`from, from+step, from+2*step, ...`
///
/// 步长非负时生成到小于`to`为止，步长为负时生成到大于`to`为止。
/// 步长为0且`from < to`时是无限的常量序列，需要配合`limit`使用。
#[derive(Debug, Eq, PartialEq)]
pub struct Range<E> {
    to: E,
    step: E,
    next: Option<E>,
}

impl<E: Endpoint> Range<E> {
    pub fn new(from: E, to: E, step: E) -> Self {
        Range { to, step, next: Some(from) }
    }
}

impl<E: Endpoint> Source for Range<E> {
    type Item = E;

    fn size_if_known(&self) -> Option<usize> {
        None
    }

    fn has_next(&mut self) -> bool {
        match self.next {
            Some(current) if self.step.is_negative() => current > self.to,
            Some(current) => current < self.to,
            None => false,
        }
    }

    fn next(&mut self) -> E {
        let current = self.next.unwrap_or_else(|| exhausted());
        self.next = current.add_step(self.step); // 溢出即区间结束
        current
    }
}

/// 种子序列：第一个元素是种子本身，之后每个元素由前一个元素计算得到。
pub struct Seed<T, F> {
    seed: Option<T>,
    previous: Option<T>,
    operator: F,
}

impl<T, F> Seed<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    pub fn new(seed: T, operator: F) -> Self {
        Seed { seed: Some(seed), previous: None, operator }
    }
}

impl<T, F> Source for Seed<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    type Item = T;

    fn size_if_known(&self) -> Option<usize> {
        None
    }

    fn has_next(&mut self) -> bool {
        true
    }

    fn next(&mut self) -> T {
        let element = match (self.seed.take(), &self.previous) {
            (Some(seed), _) => seed,
            (None, Some(previous)) => (self.operator)(previous),
            (None, None) => exhausted(),
        };
        self.previous = Some(element.clone());
        element
    }
}

/// 生成器序列：每个元素都由无参函数生成，无限且个数未知。
pub struct Supplier<F> {
    supplier: F,
}

impl<F> Supplier<F> {
    pub fn new(supplier: F) -> Self {
        Supplier { supplier }
    }
}

impl<T, F: FnMut() -> T> Source for Supplier<F> {
    type Item = T;

    fn size_if_known(&self) -> Option<usize> {
        None
    }

    fn has_next(&mut self) -> bool {
        true
    }

    fn next(&mut self) -> T {
        (self.supplier)()
    }
}
