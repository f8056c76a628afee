#![cfg(feature = "alloc")]

use core::marker::PhantomData as Cfg;
use std::rc::Rc;

use rstest::rstest;

use flex_stack::{
    alloc::{AllocatorDefault, Global},
    capacity::{GrowExact, Index},
    stack::{Custom, StackConfig},
    Stack, StorageError,
};

const SLICE: &[usize] = &[1, 2, 3, 4, 5];

#[derive(Debug, PartialEq)]
struct Element {
    a: i32,
    b: f64,
}

fn idx<C: StackConfig>(i: usize) -> C::Index {
    C::Index::from_usize(i)
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::index_u16(Cfg::<Custom<Global, u16>>)]
#[case::index_u8_exact(Cfg::<Custom<Global, u8, GrowExact>>)]
fn stack_new<C: StackConfig>(#[case] _config: Cfg<C>)
where
    C::Alloc: AllocatorDefault,
{
    let stack = Stack::<usize, C>::new();
    assert!(stack.is_empty());
    assert_eq!(stack.len().to_usize(), 0);
    assert_eq!(stack.capacity().to_usize(), 0);
    assert!(stack.is_sorted());
    assert!(stack.comparator().is_none());
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::index_u16(Cfg::<Custom<Global, u16>>)]
#[case::index_u8_exact(Cfg::<Custom<Global, u8, GrowExact>>)]
fn stack_push_pop<C: StackConfig>(#[case] _config: Cfg<C>)
where
    C::Alloc: AllocatorDefault,
{
    let mut stack = Stack::<usize, C>::new();
    for (i, v) in SLICE.iter().enumerate() {
        assert_eq!(stack.push(*v).to_usize(), i + 1);
    }
    assert_eq!(stack.as_slice(), SLICE);
    for v in SLICE.iter().rev() {
        assert_eq!(stack.pop(), Some(*v));
    }
    assert_eq!(stack.pop(), None);
    assert!(stack.capacity().to_usize() >= SLICE.len());
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::index_u16(Cfg::<Custom<Global, u16>>)]
fn stack_unshift_shift<C: StackConfig>(#[case] _config: Cfg<C>)
where
    C::Alloc: AllocatorDefault,
{
    let mut stack = Stack::<usize, C>::new();
    for v in SLICE {
        stack.unshift(*v);
    }
    assert_eq!(stack, [5, 4, 3, 2, 1]);
    for v in SLICE.iter().rev() {
        assert_eq!(stack.shift(), Some(*v));
    }
    assert_eq!(stack.shift(), None);
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::index_u8_exact(Cfg::<Custom<Global, u8, GrowExact>>)]
fn stack_insert_remove<C: StackConfig>(#[case] _config: Cfg<C>)
where
    C::Alloc: AllocatorDefault,
{
    let mut stack = Stack::<usize, C>::new();
    stack.extend([1, 2, 4]);
    stack.insert(idx::<C>(2), 3);
    assert_eq!(stack, [1, 2, 3, 4]);
    stack.insert(idx::<C>(0), 0);
    assert_eq!(stack, [0, 1, 2, 3, 4]);
    // an index past the end appends
    stack.insert(idx::<C>(100), 9);
    assert_eq!(stack, [0, 1, 2, 3, 4, 9]);

    assert_eq!(stack.remove(idx::<C>(6)), None);
    assert_eq!(stack.remove(idx::<C>(2)), Some(2));
    assert_eq!(stack, [0, 1, 3, 4, 9]);
    assert_eq!(stack.remove(idx::<C>(4)), Some(9));
    assert_eq!(stack.remove(idx::<C>(0)), Some(0));
    assert_eq!(stack, [1, 3, 4]);
    assert_eq!(stack.len().to_usize(), 3);
}

#[test]
fn stack_check_capacity_growth() {
    let mut res = [0usize; 10];
    let mut stack = Stack::<usize>::new();
    for cap in res.iter_mut() {
        stack.push(1);
        *cap = stack.capacity();
    }
    assert_eq!(res, [4, 4, 4, 4, 6, 6, 9, 9, 9, 13]);
}

#[test]
fn stack_check_capacity_growth_exact() {
    let mut stack = Stack::<usize, Custom<Global, usize, GrowExact>>::new();
    let mut res = [0usize; 6];
    for cap in res.iter_mut() {
        stack.push(1);
        *cap = stack.capacity();
    }
    assert_eq!(res, [4, 4, 4, 4, 5, 6]);
}

#[test]
fn stack_reserve() {
    let mut stack = Stack::<usize>::new();
    stack.try_reserve(10).unwrap();
    assert_eq!(stack.capacity(), 10);
    for v in 0..10 {
        stack.push(v);
    }
    assert_eq!(stack.capacity(), 10);
    stack.push(10);
    assert_eq!(stack.capacity(), 15);

    // exact reservation never shrinks
    stack.try_reserve(0).unwrap();
    assert_eq!(stack.capacity(), 15);
    stack.try_reserve(5).unwrap();
    assert_eq!(stack.capacity(), 16);
}

#[test]
fn stack_reserve_minimum() {
    let mut stack = Stack::<usize>::new();
    stack.try_reserve(0).unwrap();
    assert_eq!(stack.capacity(), 4);

    let stack = Stack::<usize>::with_reserve(None, 0);
    assert_eq!(stack.capacity(), 0);
    let stack = Stack::<usize>::with_reserve(None, 2);
    assert_eq!(stack.capacity(), 4);
    let stack = Stack::<usize>::with_reserve(None, 20);
    assert_eq!(stack.capacity(), 20);
}

#[test]
fn stack_reserve_limit() {
    let mut stack = Stack::<u64>::new();
    assert_eq!(
        stack.try_reserve(usize::MAX),
        Err(StorageError::CapacityLimit)
    );
    assert_eq!(
        Stack::<u64>::try_with_reserve(None, isize::MAX as usize).unwrap_err(),
        StorageError::CapacityLimit
    );
    stack.push(1);
    assert_eq!(
        stack.try_reserve(usize::MAX),
        Err(StorageError::CapacityLimit)
    );
    assert_eq!(stack.capacity(), 4);
}

#[test]
fn stack_index_u8_limit() {
    let mut stack = Stack::<u32, Custom<Global, u8>>::new();
    for v in 0..255 {
        stack.try_push(v).unwrap();
    }
    assert_eq!(stack.len(), 255);
    assert_eq!(stack.capacity(), 255);
    let err = stack.try_push(255).unwrap_err();
    assert_eq!(err.error(), &StorageError::CapacityLimit);
    assert_eq!(err.into_value(), 255);
    let err = stack.try_insert(0, 256).unwrap_err();
    assert_eq!(err.into_value(), 256);
    assert_eq!(stack.len(), 255);
    assert_eq!(stack.get(0), Some(&0));
    assert_eq!(stack.get(254), Some(&254));
}

#[test]
#[should_panic(expected = "Update error: Exceeded stack capacity limit")]
fn stack_index_u8_push_panic() {
    let mut stack = Stack::<u32, Custom<Global, u8>>::new();
    stack.extend(0..255);
    stack.push(255);
}

#[test]
fn stack_get_set() {
    let mut stack: Stack<usize> = SLICE.iter().copied().collect();
    assert_eq!(stack.get(0), Some(&1));
    assert_eq!(stack.get(4), Some(&5));
    assert_eq!(stack.get(5), None);
    assert_eq!(stack.set(1, 20), Ok(2));
    assert_eq!(stack.set(5, 60), Err(60));
    assert_eq!(stack, [1, 20, 3, 4, 5]);
}

#[test]
fn stack_len_of() {
    let stack: Stack<usize> = SLICE.iter().copied().collect();
    assert_eq!(Stack::len_of(Some(&stack)), Some(5));
    assert_eq!(Stack::len_of(Some(&Stack::<usize>::new())), Some(0));
    assert_eq!(Stack::<usize>::len_of(None), None);
}

#[test]
fn stack_remove_handle() {
    let first = Element { a: 1, b: 1.0 };
    let second = Element { a: 1, b: 1.0 };
    let mut stack = Stack::<&Element>::new();
    stack.push(&first);
    stack.push(&second);
    stack.push(&first);

    // identity, not equality, decides which handle is removed
    let removed = stack.remove_handle(&&second).unwrap();
    assert!(core::ptr::eq(removed, &second));
    assert_eq!(stack.len(), 2);
    assert!(stack.remove_handle(&&second).is_none());
    let removed = stack.remove_handle(&&first).unwrap();
    assert!(core::ptr::eq(removed, &first));
    assert_eq!(stack.len(), 1);
}

#[test]
fn stack_pop_order_scenario() {
    let a = Element { a: 9, b: 3.4 };
    let b = Element { a: 2, b: 2.1 };
    let mut stack = Stack::<&Element>::new();
    stack.push(&a);
    stack.push(&a);
    stack.push(&b);
    stack.push(&a);

    let popped: Vec<&Element> = core::iter::from_fn(|| stack.pop()).take(4).collect();
    assert_eq!(popped.len(), 4);
    assert!(core::ptr::eq(popped[0], &a));
    assert!(core::ptr::eq(popped[1], &b));
    assert!(core::ptr::eq(popped[2], &a));
    assert!(core::ptr::eq(popped[3], &a));
    assert_eq!(popped[1], &Element { a: 2, b: 2.1 });
    assert!(stack.is_empty());
}

#[test]
fn stack_clear_keeps_capacity() {
    let tracked = Rc::new(());
    let mut stack = Stack::<Rc<()>>::new();
    for _ in 0..6 {
        stack.push(tracked.clone());
    }
    let cap = stack.capacity();
    assert_eq!(Rc::strong_count(&tracked), 7);
    stack.clear();
    assert!(stack.is_empty());
    assert_eq!(stack.capacity(), cap);
    assert_eq!(Rc::strong_count(&tracked), 1);
}

#[test]
fn stack_drop_handles() {
    let tracked = Rc::new(());
    let mut stack = Stack::<Rc<()>>::new();
    stack.extend(core::iter::repeat(tracked.clone()).take(10));
    assert_eq!(Rc::strong_count(&tracked), 11);
    drop(stack);
    assert_eq!(Rc::strong_count(&tracked), 1);

    let mut stack = Stack::<Rc<()>>::new();
    stack.push(tracked.clone());
    stack.free();
    assert_eq!(Rc::strong_count(&tracked), 1);
}

#[test]
fn stack_into_iter() {
    let stack: Stack<usize> = SLICE.iter().copied().collect();
    let mut iter = stack.into_iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next_back(), Some(5));
    assert_eq!(iter.as_slice(), &[2, 3, 4]);
    assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn stack_into_iter_drop_remaining() {
    let tracked = Rc::new(());
    let mut stack = Stack::<Rc<()>>::new();
    stack.extend(core::iter::repeat(tracked.clone()).take(4));
    let mut iter = stack.into_iter();
    let _first = iter.next();
    drop(iter);
    assert_eq!(Rc::strong_count(&tracked), 2);
}

#[test]
fn stack_extend_large() {
    let mut stack = Stack::<usize>::new();
    stack.extend((0..100).filter(|v| v % 2 == 0));
    assert_eq!(stack.len(), 50);
    assert!(stack.iter().copied().eq((0..100).step_by(2)));
}

#[test]
fn stack_debug_eq() {
    let stack: Stack<usize> = SLICE.iter().copied().collect();
    assert_eq!(format!("{:?}", stack), "[1, 2, 3, 4, 5]");
    let other: Stack<usize, Custom<Global, u8>> = SLICE.iter().copied().collect();
    assert_eq!(stack, other);
    assert_eq!(&*stack, SLICE);
    assert_eq!((&stack).into_iter().sum::<usize>(), 15);
}

#[test]
fn stack_new_in() {
    let mut stack = Stack::<usize, _>::new_in(Custom::<Global, u16>::new_in(Global));
    stack.push(1);
    assert_eq!(stack.len(), 1u16);
    let stack =
        Stack::<usize, _>::with_reserve_in(Custom::<Global, u16>::default(), None, 7u16);
    assert_eq!(stack.capacity(), 7u16);
}

#[test]
fn stack_zero_sized() {
    let mut stack = Stack::<()>::new();
    for _ in 0..100 {
        stack.push(());
    }
    assert_eq!(stack.len(), 100);
    assert_eq!(stack.pop(), Some(()));
}
