// 2次元の厳密ユークリッド距離変換
// Felzenszwalb-Huttenlocher の放物線下包絡アルゴリズム（2パス、O(n)）

/// 「背景なし」を表す番兵距離（2乗値）
///
/// f64::INFINITY ではなく大きな有限値を使う。平面に背景ピクセルが
/// 1つも無い場合でも包絡計算の引き算が NaN にならない。
pub(crate) const FAR: f64 = 1e20;

/// 二値平面の2乗ユークリッド距離変換
///
/// 各セルについて最も近い背景セル（`foreground[i] == false`）までの
/// 2乗距離を返す。背景が存在しない場合は FAR 程度の値になる。
pub(crate) fn squared_edt(foreground: &[bool], width: usize, height: usize) -> Vec<f64> {
    assert_eq!(foreground.len(), width * height);

    let mut grid: Vec<f64> = foreground
        .iter()
        .map(|&fg| if fg { FAR } else { 0.0 })
        .collect();

    let n = width.max(height);
    let mut f = vec![0.0f64; n];
    let mut d = vec![0.0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];

    // 縦方向（列ごと）
    for x in 0..width {
        for y in 0..height {
            f[y] = grid[y * width + x];
        }
        transform_1d(&f[..height], &mut d, &mut v, &mut z);
        for y in 0..height {
            grid[y * width + x] = d[y];
        }
    }

    // 横方向（行ごと）
    for y in 0..height {
        f[..width].copy_from_slice(&grid[y * width..(y + 1) * width]);
        transform_1d(&f[..width], &mut d, &mut v, &mut z);
        grid[y * width..(y + 1) * width].copy_from_slice(&d[..width]);
    }

    grid
}

/// 1次元の2乗距離変換（標本点ごとの放物線の下包絡を構築する）
fn transform_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    for q in 1..n {
        let mut s = intersection(f, q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersection(f, q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dx = q as f64 - v[k] as f64;
        d[q] = dx * dx + f[v[k]];
    }
}

/// 放物線 q と v[k] の交点の横座標
fn intersection(f: &[f64], q: usize, p: usize) -> f64 {
    let qf = q as f64;
    let pf = p as f64;
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
}
