//! Integration tests for boolean reductions (any, all)
//!
//! Tests verify correctness across:
//! - Sequential and parallel paths, including the cutover boundary
//! - Contiguous and strided addressing
//! - The NaN-converts-to-true predicate and the empty-axis identities
//! - Native and tree group folds
//! - Concurrent independent launches

mod common;

use common::{make_queue, make_queue_with_sub_groups, view_mut_of, view_of};
use ndkern::dispatch::boolean_reduction_kernels;
use ndkern::prelude::*;

/// Run `all` over one contiguous row, returning the single result slot
fn run_all_contig(queue: &Queue, data: &[f64]) -> i32 {
    let a = DeviceBuffer::from_slice(data).unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();
    let kernel = boolean_reduction_kernels()
        .all_contig
        .lookup(DType::F64)
        .unwrap();
    kernel(
        queue,
        1,
        data.len(),
        &view_of::<f64>(&a, Layout::contiguous(&[data.len()])),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();
    out.to_vec::<i32>()[0]
}

/// Run `any` over one contiguous row, returning the single result slot
fn run_any_contig(queue: &Queue, data: &[f64]) -> i32 {
    let a = DeviceBuffer::from_slice(data).unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();
    let kernel = boolean_reduction_kernels()
        .any_contig
        .lookup(DType::F64)
        .unwrap();
    kernel(
        queue,
        1,
        data.len(),
        &view_of::<f64>(&a, Layout::contiguous(&[data.len()])),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();
    out.to_vec::<i32>()[0]
}

#[test]
fn test_all_with_zero_is_false() {
    let queue = make_queue();
    assert_eq!(run_all_contig(&queue, &[1.0, 2.0, 0.0, 4.0]), 0);
}

#[test]
fn test_all_nonzero_is_true() {
    let queue = make_queue();
    assert_eq!(run_all_contig(&queue, &[1.0, 2.0, -3.0, 4.0]), 1);
}

#[test]
fn test_any_all_zeros_is_false() {
    let queue = make_queue();
    assert_eq!(run_any_contig(&queue, &[0.0, 0.0, 0.0]), 0);
}

#[test]
fn test_any_with_nonzero_is_true() {
    let queue = make_queue();
    assert_eq!(run_any_contig(&queue, &[0.0, 0.0, 5.0]), 1);
}

#[test]
fn test_nan_converts_to_true() {
    let queue = make_queue();
    assert_eq!(run_all_contig(&queue, &[f64::NAN]), 1);
    assert_eq!(run_any_contig(&queue, &[0.0, f64::NAN]), 1);
    assert_eq!(run_all_contig(&queue, &[f64::NAN, 0.0]), 0);
}

#[test]
fn test_empty_axis_identities() {
    // all of nothing is true, any of nothing is false
    let queue = make_queue();
    assert_eq!(run_all_contig(&queue, &[]), 1);
    assert_eq!(run_any_contig(&queue, &[]), 0);
}

#[test]
fn test_sequential_and_parallel_agree_at_boundaries() {
    // wg = 4 * 2 = 8 on the pinned device, so lengths 7/8/9 straddle the
    // sequential/parallel cutover and 31/32/33 straddle the
    // reductions-per-work-item switch. The wide host device (wg = 32) covers
    // the same lengths on the other side of its own cutover.
    let narrow = make_queue_with_sub_groups(&[2]);
    let wide = make_queue();

    for len in [1usize, 7, 8, 9, 31, 32, 33, 65] {
        let patterns: Vec<Vec<f64>> = vec![
            vec![1.0; len],
            {
                let mut v = vec![1.0; len];
                v[len - 1] = 0.0;
                v
            },
            vec![0.0; len],
            {
                let mut v = vec![0.0; len];
                v[len - 1] = 7.0;
                v
            },
            {
                let mut v = vec![1.0; len];
                v[0] = f64::NAN;
                v
            },
        ];

        for data in patterns {
            let expect_all = data.iter().all(|&v| v != 0.0) as i32;
            let expect_any = data.iter().any(|&v| v != 0.0) as i32;
            assert_eq!(run_all_contig(&narrow, &data), expect_all, "all len {len}");
            assert_eq!(run_all_contig(&wide, &data), expect_all, "all len {len}");
            assert_eq!(run_any_contig(&narrow, &data), expect_any, "any len {len}");
            assert_eq!(run_any_contig(&wide, &data), expect_any, "any len {len}");
        }
    }
}

#[test]
fn test_tree_fallback_matches_native() {
    let native = make_queue_with_sub_groups(&[2]);
    let fallback =
        Queue::new(Device::with_sub_group_sizes(&[2]).without_group_collectives()).unwrap();

    for len in [8usize, 33, 100] {
        let mut data = vec![1.0f64; len];
        data[len / 2] = 0.0;
        assert_eq!(
            run_all_contig(&native, &data),
            run_all_contig(&fallback, &data)
        );
        assert_eq!(
            run_any_contig(&native, &data),
            run_any_contig(&fallback, &data)
        );
    }
}

#[test]
fn test_contig_multiple_rows_parallel_path() {
    // Three rows of 40 elements each on a wg = 8 device: every row takes the
    // parallel path with several groups merging into its slot.
    let queue = make_queue_with_sub_groups(&[2]);
    let mut data = vec![1i32; 120];
    data[40 + 7] = 0; // row 1 contains a zero
    for v in data.iter_mut().skip(80) {
        *v = 0; // row 2 is all zeros
    }
    let a = DeviceBuffer::from_slice(&data).unwrap();
    let out_all = DeviceBuffer::alloc(3, DType::I32).unwrap();
    let out_any = DeviceBuffer::alloc(3, DType::I32).unwrap();

    let all = boolean_reduction_kernels().all_contig.lookup(DType::I32).unwrap();
    let any = boolean_reduction_kernels().any_contig.lookup(DType::I32).unwrap();
    let in_layout = Layout::contiguous(&[120]);
    all(
        &queue,
        3,
        40,
        &view_of::<i32>(&a, in_layout.clone()),
        &view_mut_of::<i32>(&out_all, Layout::contiguous(&[3])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();
    any(
        &queue,
        3,
        40,
        &view_of::<i32>(&a, in_layout),
        &view_mut_of::<i32>(&out_any, Layout::contiguous(&[3])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();

    assert_eq!(out_all.to_vec::<i32>(), vec![1, 0, 0]);
    assert_eq!(out_any.to_vec::<i32>(), vec![1, 1, 0]);
}

#[test]
fn test_strided_reduction_along_leading_axis() {
    // [3, 4] row-major input reduced along axis 0 into 4 slots: the
    // iteration axis is the trailing dimension (stride 1), the reduction
    // axis strides by a full row.
    let queue = make_queue();
    #[rustfmt::skip]
    let data = [
        1.0f64, 0.0, 3.0, 1.0,
        1.0,    5.0, 0.0, 2.0,
        2.0,    6.0, 1.0, 3.0,
    ];
    let a = DeviceBuffer::from_slice(&data).unwrap();
    let out_all = DeviceBuffer::alloc(4, DType::I32).unwrap();
    let out_any = DeviceBuffer::alloc(4, DType::I32).unwrap();

    let iter_layout = Layout::new(&[4], &[1], 0);
    let red_axes = Layout::new(&[3], &[4], 0);

    let all = boolean_reduction_kernels().all_strided.lookup(DType::F64).unwrap();
    all(
        &queue,
        4,
        3,
        &view_of::<f64>(&a, iter_layout.clone()),
        &view_mut_of::<i32>(&out_all, Layout::contiguous(&[4])),
        &red_axes,
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();

    let any = boolean_reduction_kernels().any_strided.lookup(DType::F64).unwrap();
    any(
        &queue,
        4,
        3,
        &view_of::<f64>(&a, iter_layout),
        &view_mut_of::<i32>(&out_any, Layout::contiguous(&[4])),
        &red_axes,
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();

    // columns: [1,1,2] [0,5,6] [3,0,1] [1,2,3]
    assert_eq!(out_all.to_vec::<i32>(), vec![1, 0, 0, 1]);
    assert_eq!(out_any.to_vec::<i32>(), vec![1, 1, 1, 1]);
}

#[test]
fn test_strided_reduction_parallel_path_matches_sequential() {
    // [40, 5] input reduced along axis 0. On the narrow device (wg = 8) the
    // 40-element axis takes the parallel path; on the wide host device
    // (wg = 32) it also does; both must match the directly computed answer.
    let n0 = 40usize;
    let n1 = 5usize;
    let mut data = vec![1.0f64; n0 * n1];
    data[3 * n1 + 1] = 0.0; // column 1 gains a zero
    for i in 0..n0 {
        data[i * n1 + 4] = 0.0; // column 4 is all zeros
    }
    let a = DeviceBuffer::from_slice(&data).unwrap();

    for queue in [make_queue_with_sub_groups(&[2]), make_queue()] {
        let out_all = DeviceBuffer::alloc(n1, DType::I32).unwrap();
        let out_any = DeviceBuffer::alloc(n1, DType::I32).unwrap();
        let iter_layout = Layout::new(&[n1], &[1], 0);
        let red_axes = Layout::new(&[n0], &[n1 as isize], 0);

        let all = boolean_reduction_kernels().all_strided.lookup(DType::F64).unwrap();
        all(
            &queue,
            n1,
            n0,
            &view_of::<f64>(&a, iter_layout.clone()),
            &view_mut_of::<i32>(&out_all, Layout::contiguous(&[n1])),
            &red_axes,
            &[],
        )
        .unwrap()
        .wait()
        .unwrap();

        let any = boolean_reduction_kernels().any_strided.lookup(DType::F64).unwrap();
        any(
            &queue,
            n1,
            n0,
            &view_of::<f64>(&a, iter_layout),
            &view_mut_of::<i32>(&out_any, Layout::contiguous(&[n1])),
            &red_axes,
            &[],
        )
        .unwrap()
        .wait()
        .unwrap();

        assert_eq!(out_all.to_vec::<i32>(), vec![1, 0, 1, 1, 0]);
        assert_eq!(out_any.to_vec::<i32>(), vec![1, 1, 1, 1, 0]);
    }
}

#[test]
fn test_strided_reduction_negative_stride_axis() {
    // Reversed reduction axis must see the same element set.
    let queue = make_queue();
    let data = [0.0f64, 0.0, 9.0, 0.0];
    let a = DeviceBuffer::from_slice(&data).unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();

    let any = boolean_reduction_kernels().any_strided.lookup(DType::F64).unwrap();
    any(
        &queue,
        1,
        4,
        &view_of::<f64>(&a, Layout::new(&[1], &[0], 0)),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &Layout::new(&[4], &[-1], 3),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();

    assert_eq!(out.to_vec::<i32>(), vec![1]);
}

#[test]
fn test_reduction_supports_integer_and_bool_inputs() {
    let queue = make_queue();
    let ints = DeviceBuffer::from_slice(&[3u8, 1, 255]).unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();
    let all = boolean_reduction_kernels().all_contig.lookup(DType::U8).unwrap();
    all(
        &queue,
        1,
        3,
        &view_of::<u8>(&ints, Layout::contiguous(&[3])),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();
    assert_eq!(out.to_vec::<i32>(), vec![1]);

    let bools = DeviceBuffer::from_slice(&[ndkern::dtype::Bool::TRUE, ndkern::dtype::Bool::FALSE])
        .unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();
    let all = boolean_reduction_kernels().all_contig.lookup(DType::Bool).unwrap();
    all(
        &queue,
        1,
        2,
        &view_of::<ndkern::dtype::Bool>(&bools, Layout::contiguous(&[2])),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &[],
    )
    .unwrap()
    .wait()
    .unwrap();
    assert_eq!(out.to_vec::<i32>(), vec![0]);
}

#[test]
fn test_concurrent_independent_reductions_do_not_interfere() {
    // Eight launches with disjoint outputs, no host-side waits in between;
    // results must be independent of relative scheduling.
    let queue = make_queue_with_sub_groups(&[2]);
    let len = 64usize;

    let inputs: Vec<DeviceBuffer> = (0..8)
        .map(|k| {
            let mut data = vec![1.0f64; len];
            if k % 2 == 0 {
                data[k * 3] = 0.0;
            }
            DeviceBuffer::from_slice(&data).unwrap()
        })
        .collect();
    let outputs: Vec<DeviceBuffer> = (0..8)
        .map(|_| DeviceBuffer::alloc(1, DType::I32).unwrap())
        .collect();

    let all = boolean_reduction_kernels().all_contig.lookup(DType::F64).unwrap();
    let events: Vec<Event> = inputs
        .iter()
        .zip(&outputs)
        .map(|(a, out)| {
            all(
                &queue,
                1,
                len,
                &view_of::<f64>(a, Layout::contiguous(&[len])),
                &view_mut_of::<i32>(out, Layout::contiguous(&[1])),
                &[],
            )
            .unwrap()
        })
        .collect();
    for ev in events {
        ev.wait().unwrap();
    }

    for (k, out) in outputs.iter().enumerate() {
        let expected = if k % 2 == 0 { 0 } else { 1 };
        assert_eq!(out.to_vec::<i32>(), vec![expected], "launch {k}");
    }
}

#[test]
fn test_reduction_depends_on_producer_event() {
    // all(a * b) chained through the multiply event, no host-side wait.
    use ndkern::dispatch::multiply_kernels;

    let queue = make_queue();
    let a = DeviceBuffer::from_slice(&[1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let b = DeviceBuffer::from_slice(&[1.0f64, 1.0, 0.0, 1.0]).unwrap();
    let product = DeviceBuffer::alloc(4, DType::F64).unwrap();
    let out = DeviceBuffer::alloc(1, DType::I32).unwrap();

    let mul = multiply_kernels().contig.lookup(DType::F64, DType::F64).unwrap();
    let layout = Layout::contiguous(&[4]);
    let mul_ev = mul(
        &queue,
        4,
        &view_of::<f64>(&a, layout.clone()),
        &view_of::<f64>(&b, layout.clone()),
        &view_mut_of::<f64>(&product, layout.clone()),
        &[],
    )
    .unwrap();

    let all = boolean_reduction_kernels().all_contig.lookup(DType::F64).unwrap();
    all(
        &queue,
        1,
        4,
        &view_of::<f64>(&product, layout),
        &view_mut_of::<i32>(&out, Layout::contiguous(&[1])),
        &[mul_ev],
    )
    .unwrap()
    .wait()
    .unwrap();

    assert_eq!(out.to_vec::<i32>(), vec![0]);
}
