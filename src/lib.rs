//! 惰性求值的单次流水线。
//!
//! 中间操作（`filter`、`map`、`flat_map`、`peek`、`distinct`、`sorted`、`limit`、`skip`）只声明处理步骤，
//! 终止操作触发时才把全部步骤融合为一次对数据源的遍历，并在下游可以提前结束时停止生产。
//!
//! ```
//! use rstream::stream;
//!
//! let res = stream![5, 3, 8, 1, 3].distinct(|x| *x).sorted(|a, b| a.cmp(b)).skip(1).to_vec();
//! assert_eq!(res, vec![3, 5, 8]);
//! ```

mod config;
mod err;
mod factory;
mod op;
mod optional;
mod pipeline;
mod source;
mod stage;
mod terminal;

pub use err::StreamErr;
pub use factory::{count_from, generate, iterate, of, of_iter, of_map, of_sequence, of_slice, range, range_step, repeat, repeat_n};
pub use op::stateful::{Distinct, Limit, Skip, Sorted};
pub use op::{Filter, FlatMap, Map, Peek};
pub use optional::{Nullable, Optional};
pub use pipeline::{Head, Pipeline, Stream};
pub use source::{Endpoint, Iter, List, Range, Seed, Slice, Source, Supplier};
pub use stage::Stage;

/// 使用字面值创建流：
/// ```
/// use rstream::stream;
///
/// assert_eq!(stream![1, 2, 3].count(), 3);
/// assert_eq!(stream!["a", "b"].to_vec(), vec!["a", "b"]);
/// ```
#[macro_export]
macro_rules! stream {
    () => {
        $crate::of(::std::vec::Vec::new())
    };
    ($($element:expr),+ $(,)?) => {
        $crate::of(::std::vec![$($element),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples() {
        assert_eq!(range(1, 101).reduce_from(0, |a, b| a + b), 5050);
        assert_eq!(stream![1, 2, 3, 4].skip(1).limit(2).to_vec(), vec![2, 3]);
        assert_eq!(repeat("a").limit(5).collect::<Vec<_>>(), vec!["a"; 5]);
        assert_eq!(range_step(5, 0, -1).limit(4).to_vec(), vec![5, 4, 3, 2]);
        assert!(!of(Vec::<i32>::new()).any_match(|_| true));
    }

    #[test]
    fn test_custom_terminal_stage() {
        struct Max(Option<i32>, usize);

        impl Stage<i32> for Max {
            fn begin(&mut self, size: Option<usize>) {
                self.1 = size.unwrap_or_default();
            }

            fn accept(&mut self, item: i32) {
                self.0 = Some(self.0.map_or(item, |max| max.max(item)));
            }
        }

        let max = stream![3, 9, 2].map(|x| x * 2).execute(Max(None, 0));
        assert_eq!(max.0, Some(18));
        assert_eq!(max.1, 3);
    }

    #[test]
    fn test_whole_pipeline() {
        let mut peeked = Vec::new();
        let res = range(0, 30)
            .filter(|x| x % 2 == 0)
            .map(|x| x / 2)
            .flat_map(|x| stream![x, x])
            .distinct(|x| *x)
            .peek(|x| peeked.push(*x))
            .sorted(|a, b| b.cmp(a))
            .skip(2)
            .limit(3)
            .to_vec();
        assert_eq!(res, vec![12, 11, 10]);
        assert_eq!(peeked, (0..15).collect::<Vec<_>>());
    }
}
