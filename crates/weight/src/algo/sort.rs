use std::{cmp::Ordering, ops::Index};

/// any indexable collection that can swap two slots can be sorted in place
pub(crate) trait SortableCollection: Index<usize, Output = Self::Item> {
    type Item;

    fn len(&self) -> usize;

    fn swap(&mut self, i: usize, j: usize);

    /// stable, close to linear when the input is nearly sorted
    fn insertion_sort(&mut self, compare: impl Fn(&Self::Item, &Self::Item) -> Ordering) {
        for i in 1..self.len() {
            let mut index = i;
            while index > 0 && compare(&self[index], &self[index - 1]).is_lt() {
                self.swap(index, index - 1);
                index -= 1;
            }
        }
    }
}

impl<T> SortableCollection for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.as_mut_slice().swap(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_sort_sorts_every_element() {
        let mut values = vec![5, 3, 9, 1, 1, 8, 0];
        values.insertion_sort(|a, b| a.cmp(b));
        assert_eq!(values, vec![0, 1, 1, 3, 5, 8, 9]);
    }

    #[test]
    fn test_insertion_sort_is_stable() {
        let mut values = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        values.insertion_sort(|a, b| a.0.cmp(&b.0));
        assert_eq!(values, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<i32> = vec![];
        empty.insertion_sort(|a, b| a.cmp(b));
        assert!(empty.is_empty());

        let mut single = vec![42];
        single.insertion_sort(|a, b| a.cmp(b));
        assert_eq!(single, vec![42]);
    }
}
