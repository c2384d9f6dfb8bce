// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_tiling::{TileCoordinate, TileGrid, TiledView, TilingOptions};

fn bench_tiles_intersecting(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling/tiles_intersecting");

    // Gigapixel-scale image, viewport-sized queries at native resolution.
    let grid = TileGrid::new(Size::new(65_536.0, 65_536.0), Size::new(256.0, 256.0), 9).unwrap();
    for viewport in [512.0_f64, 1_920.0, 3_840.0] {
        let visible = Rect::from_origin_size(
            Point::new(30_000.0, 30_000.0),
            Size::new(viewport, viewport * 0.5625),
        );
        let count = grid.tiles_intersecting(visible, 8).len();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(viewport), &visible, |b, visible| {
            b.iter(|| black_box(grid.tiles_intersecting(black_box(*visible), 8)));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let options = TilingOptions::new(Size::new(65_536.0, 65_536.0))
        .with_tile_size(Size::new(256.0, 256.0))
        .with_levels_of_detail(9);
    let mut view = TiledView::new(options, |tile: TileCoordinate, _scale: f64| Some(tile));
    let controller = view.controller_mut();
    controller.set_bounds_size(Size::new(1_920.0, 1_080.0));
    controller.set_zoom_scale(0.7).unwrap();
    controller
        .set_content_offset(Point::new(20_000.0, 20_000.0))
        .unwrap();

    c.bench_function("tiling/frame", |b| {
        b.iter(|| black_box(view.frame()));
    });
}

criterion_group!(benches, bench_tiles_intersecting, bench_frame);
criterion_main!(benches);
