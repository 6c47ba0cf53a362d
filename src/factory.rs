use crate::pipeline::{Head, Pipeline, Stream};
use crate::source::{Endpoint, Iter, List, Range, Seed, Slice, Source, Supplier};

/// 使用给定的元素列表创建流。
///
/// 例如：
/// ```
/// assert_eq!(rstream::of(vec![1, 2, 3]).count(), 3);
/// ```
pub fn of<T>(elements: Vec<T>) -> Stream<impl Pipeline<Item = T>> {
    Stream::new(Head::new(List::new(elements)))
}

/// 使用切片创建流，元素逐个克隆。
pub fn of_slice<T: Clone>(slice: &[T]) -> Stream<impl Pipeline<Item = T>> {
    Stream::new(Head::new(Slice::new(slice)))
}

/// 使用任意可迭代的值创建流。
pub fn of_iter<I: IntoIterator>(iter: I) -> Stream<impl Pipeline<Item = I::Item>> {
    Stream::new(Head::new(Iter::new(iter.into_iter())))
}

/// 使用映射创建流，元素为`(键, 值)`，顺序由映射本身决定。
///
/// 例如：
/// ```
/// use std::collections::BTreeMap;
///
/// let map = BTreeMap::from([(1, "a"), (2, "b")]);
/// assert_eq!(rstream::of_map(map).map(|(k, v)| (v, k)).to_vec(), vec![("a", 1), ("b", 2)]);
/// ```
pub fn of_map<K, V, M>(map: M) -> Stream<impl Pipeline<Item = (K, V)>>
where
    M: IntoIterator<Item = (K, V)>,
{
    of_iter(map)
}

/// 使用自定义的数据源创建流。
pub fn of_sequence<S: Source>(source: S) -> Stream<impl Pipeline<Item = S::Item>> {
    Stream::new(Head::new(source))
}

/// 左闭右开区间`[from, to)`，步长为1。
///
/// 例如：
/// ```
/// assert_eq!(rstream::range(1, 101).reduce_from(0, |a, b| a + b), 5050);
/// ```
pub fn range<E: Endpoint>(from: E, to: E) -> Stream<impl Pipeline<Item = E>> {
    range_step(from, to, E::ONE)
}

/// 按步长生成的左闭右开区间，步长可以为负。
///
/// 步长为0且`from < to`时生成无限的常量序列，需要配合`limit`使用。
///
/// 例如：
/// ```
/// assert_eq!(rstream::range_step(5, 0, -1).limit(4).to_vec(), vec![5, 4, 3, 2]);
/// assert_eq!(rstream::range_step(0u64, 10, 4).to_vec(), vec![0, 4, 8]);
/// ```
pub fn range_step<E: Endpoint>(from: E, to: E, step: E) -> Stream<impl Pipeline<Item = E>> {
    Stream::new(Head::new(Range::new(from, to, step)))
}

/// 从`from`开始逐一递增的计数流，直到该类型的最大值（不含）为止，通常配合`limit`使用。
///
/// 例如：
/// ```
/// assert_eq!(rstream::count_from(3).limit(4).to_vec(), vec![3, 4, 5, 6]);
/// ```
pub fn count_from<E: Endpoint>(from: E) -> Stream<impl Pipeline<Item = E>> {
    range(from, E::MAX)
}

/// 无限重复同一个元素。
pub fn repeat<T: Clone>(element: T) -> Stream<impl Pipeline<Item = T>> {
    generate(move || element.clone())
}

/// 重复同一个元素`count`次。
pub fn repeat_n<T: Clone>(element: T, count: usize) -> Stream<impl Pipeline<Item = T>> {
    repeat(element).limit(count)
}

/// 从种子开始，每个元素由前一个元素计算得到的无限流。
///
/// 例如：
/// ```
/// assert_eq!(rstream::iterate(1, |x| x * 2).limit(5).to_vec(), vec![1, 2, 4, 8, 16]);
/// ```
pub fn iterate<T, F>(seed: T, operator: F) -> Stream<impl Pipeline<Item = T>>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    Stream::new(Head::new(Seed::new(seed, operator)))
}

/// 每个元素都由生成器生成的无限流。
pub fn generate<T, F>(supplier: F) -> Stream<impl Pipeline<Item = T>>
where
    F: FnMut() -> T,
{
    Stream::new(Head::new(Supplier::new(supplier)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Countdown(u32);

    impl Source for Countdown {
        type Item = u32;

        fn size_if_known(&self) -> Option<usize> {
            Some(self.0 as usize)
        }

        fn has_next(&mut self) -> bool {
            self.0 > 0
        }

        fn next(&mut self) -> u32 {
            self.0 -= 1;
            self.0 + 1
        }
    }

    #[test]
    fn test_of() {
        assert_eq!(of(vec!["a", "b"]).to_vec(), vec!["a", "b"]);
        assert_eq!(of(Vec::<i32>::new()).count(), 0);
    }

    #[test]
    fn test_stream_macro() {
        assert_eq!(crate::stream![1, 2, 3].to_vec(), vec![1, 2, 3]);
        assert_eq!(crate::stream![1, 2, 3,].count(), 3);
        assert!(!crate::stream![].any_match(|_: &i32| true));
    }

    #[test]
    fn test_of_slice() {
        let words = vec!["x".to_string(), "y".to_string()];
        assert_eq!(of_slice(&words).map(|s| s + "!").to_vec(), vec!["x!", "y!"]);
        assert_eq!(words.len(), 2);
        assert_eq!(of_slice(&words).to_string(), "source(2)");
    }

    #[test]
    fn test_of_iter() {
        assert_eq!(of_iter(1..=4).to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(of_iter("a,b,c".split(',')).to_vec(), vec!["a", "b", "c"]);
        assert_eq!(of_iter((1..).map(|x| x * x)).limit(3).to_vec(), vec![1, 4, 9]);
    }

    #[test]
    fn test_of_map() {
        let map = BTreeMap::from([(2, "b"), (1, "a")]);
        assert_eq!(of_map(map).to_vec(), vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn test_of_sequence() {
        assert_eq!(of_sequence(Countdown(3)).to_vec(), vec![3, 2, 1]);
        assert_eq!(of_sequence(Countdown(3)).to_string(), "source(3)");
    }

    #[test]
    fn test_range() {
        assert_eq!(range(0, 5).to_vec(), vec![0, 1, 2, 3, 4]);
        assert_eq!(range(5, 0).count(), 0);
        assert_eq!(range(-2i8, 2).to_vec(), vec![-2, -1, 0, 1]);
        assert_eq!(range(u128::MAX - 2, u128::MAX).to_vec(), vec![u128::MAX - 2, u128::MAX - 1]);
        assert_eq!(range_step(0, 10, 3).to_vec(), vec![0, 3, 6, 9]);
        assert_eq!(range_step(1, 2, 0).limit(3).to_vec(), vec![1, 1, 1]);
    }

    #[test]
    fn test_count_from() {
        assert_eq!(count_from(0).limit(4).to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(count_from(-2i64).skip(1).limit(3).to_vec(), vec![-1, 0, 1]);
        assert_eq!(count_from(u8::MAX - 3).to_vec(), vec![252, 253, 254]);
        assert_eq!(count_from(u8::MAX).count(), 0);
        assert_eq!(count_from(7usize).to_string(), "source(?)");
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat("a").limit(5).collect::<Vec<_>>(), vec!["a", "a", "a", "a", "a"]);
        assert_eq!(repeat_n(vec![1], 2).to_vec(), vec![vec![1], vec![1]]);
        assert_eq!(repeat_n(0, 0).count(), 0);
    }

    #[test]
    fn test_iterate() {
        assert_eq!(iterate(String::from("a"), |s| format!("{s}a")).limit(3).to_vec(), vec!["a", "aa", "aaa"]);
        assert_eq!(iterate(1i32, |x| x * 2).limit(31).count(), 31);
    }

    #[test]
    fn test_generate() {
        let mut n = 0;
        assert_eq!(
            generate(|| {
                n += 2;
                n
            })
            .limit(3)
            .to_vec(),
            vec![2, 4, 6]
        );
    }
}
