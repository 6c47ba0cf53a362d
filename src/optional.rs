use crate::err::StreamErr;
use std::any::Any;
use std::{rc, sync};

/// 可能为空的值，用于可能没有结果的操作，例如`reduce`和`find_first`。
///
/// 两种状态互斥且构造后不可变。通过`of`或`of_nullable`构造时，空引用一类的值（见[`Nullable`]）不会被包装为有值。
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Optional<T> {
    Absent,
    Present(T),
}

/// 运行期可能为空的值：`None`、空指针、已失效的弱引用。
pub trait Nullable {
    fn is_nil(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Nullable for *const T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for *mut T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T> Nullable for rc::Weak<T> {
    fn is_nil(&self) -> bool {
        self.strong_count() == 0
    }
}

impl<T> Nullable for sync::Weak<T> {
    fn is_nil(&self) -> bool {
        self.strong_count() == 0
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Optional::Absent
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Optional::Present(value),
            None => Optional::Absent,
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T> Optional<T> {
    pub fn empty() -> Self {
        Optional::Absent
    }

    /// 无条件构造有值的`Optional`。
    pub fn present(value: T) -> Self {
        Optional::Present(value)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Optional::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    /// 取出值，为空时返回[`StreamErr::Absent`]。
    pub fn get(self) -> Result<T, StreamErr> {
        self.or_err(StreamErr::Absent)
    }

    pub fn as_ref(&self) -> Optional<&T> {
        match self {
            Optional::Present(value) => Optional::Present(value),
            Optional::Absent => Optional::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Optional::Present(value) => Some(value),
            Optional::Absent => None,
        }
    }

    pub fn if_present(&self, consumer: impl FnOnce(&T)) {
        if let Optional::Present(value) = self {
            consumer(value);
        }
    }

    pub fn if_absent(&self, action: impl FnOnce()) {
        if self.is_absent() {
            action();
        }
    }

    /// 有值且满足断言时保持不变，否则为空。
    pub fn filter(self, test: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Optional::Present(value) if test(&value) => Optional::Present(value),
            _ => Optional::Absent,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        match self {
            Optional::Present(value) => Optional::Present(f(value)),
            Optional::Absent => Optional::Absent,
        }
    }

    /// 同`map`，但转换结果为空引用一类的值时也为空。
    pub fn map_nullable<U: Nullable>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        match self {
            Optional::Present(value) => Optional::of_nullable(f(value)),
            Optional::Absent => Optional::Absent,
        }
    }

    pub fn flat_map<U>(self, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
        match self {
            Optional::Present(value) => f(value),
            Optional::Absent => Optional::Absent,
        }
    }

    pub fn or_else(self, other: T) -> T {
        match self {
            Optional::Present(value) => value,
            Optional::Absent => other,
        }
    }

    pub fn or_else_get(self, supplier: impl FnOnce() -> T) -> T {
        match self {
            Optional::Present(value) => value,
            Optional::Absent => supplier(),
        }
    }

    pub fn or_default(self) -> T
    where
        T: Default,
    {
        self.or_else_get(T::default)
    }

    /// 为空时返回给定的错误。
    pub fn or_err<E>(self, err: E) -> Result<T, E> {
        self.or_err_get(|| err)
    }

    pub fn or_err_get<E>(self, supplier: impl FnOnce() -> E) -> Result<T, E> {
        match self {
            Optional::Present(value) => Ok(value),
            Optional::Absent => Err(supplier()),
        }
    }

    /// 为空时以给定的载荷panic，载荷原样传递给`catch_unwind`。
    #[track_caller]
    pub fn or_panic<A: Any + Send + 'static>(self, payload: A) -> T {
        self.or_panic_get(|| payload)
    }

    #[track_caller]
    pub fn or_panic_get<A: Any + Send + 'static>(self, supplier: impl FnOnce() -> A) -> T {
        match self {
            Optional::Present(value) => value,
            Optional::Absent => std::panic::panic_any(supplier()),
        }
    }
}

impl<T: Nullable> Optional<T> {
    /// 构造有值的`Optional`，值为空引用一类的值时返回[`StreamErr::NilValue`]。
    pub fn of(value: T) -> Result<Self, StreamErr> {
        if value.is_nil() { Err(StreamErr::NilValue) } else { Ok(Optional::Present(value)) }
    }

    /// 值为空引用一类的值时返回空，否则有值。
    pub fn of_nullable(value: T) -> Self {
        if value.is_nil() { Optional::Absent } else { Optional::Present(value) }
    }
}
