// BoundaryExtractor - ラベルマップからの境界マスク導出
//
// クラスごとの one-hot 指示平面に対して両側の距離変換を取り、
// 半径 radius 以内に境界を持つピクセルを 1 にする。クラスごとに
// 独立して判定するため、3クラス以上が接する地点も正しく拾え、
// クラスIDの並べ替えに対して不変。

mod distance;

use crate::core::{EdgeMask, LabelMap, PrepError, PrepResult};
use distance::squared_edt;

/// 境界近傍とみなす半径（ユークリッド距離、ピクセル単位）のデフォルト値
pub const DEFAULT_RADIUS: u32 = 2;

/// ラベルマップ1枚を二値エッジマスク1枚へ写す純粋な計算器
#[derive(Debug, Clone)]
pub struct BoundaryExtractor {
    n_classes: usize,
    radius: u32,
}

impl BoundaryExtractor {
    /// 新しい抽出器を作成
    pub fn new(n_classes: usize, radius: u32) -> PrepResult<Self> {
        if n_classes == 0 {
            return Err(PrepError::configuration(
                "クラス数は1以上である必要があります",
            ));
        }
        if n_classes > u16::MAX as usize + 1 {
            return Err(PrepError::configuration(format!(
                "クラス数 {n_classes} は16bitラベルで表現できません"
            )));
        }
        if radius == 0 {
            return Err(PrepError::configuration(
                "境界半径は1以上である必要があります",
            ));
        }
        Ok(Self { n_classes, radius })
    }

    /// デフォルト半径の抽出器を作成
    pub fn with_default_radius(n_classes: usize) -> PrepResult<Self> {
        Self::new(n_classes, DEFAULT_RADIUS)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// ラベルマップからエッジマスクを計算
    ///
    /// 全ピクセル値が `[0, n_classes)` に収まることを検証し、
    /// 範囲外の値は `InvalidLabel` として弾く。
    pub fn compute(&self, label: &LabelMap) -> PrepResult<EdgeMask> {
        let width = label.width() as usize;
        let height = label.height() as usize;

        // ラベル範囲の検証と出現クラスの収集
        let mut present = vec![false; self.n_classes];
        for (idx, &value) in label.pixels().iter().enumerate() {
            if (value as usize) >= self.n_classes {
                return Err(PrepError::InvalidLabel {
                    value,
                    x: (idx % width) as u32,
                    y: (idx / width) as u32,
                    n_classes: self.n_classes,
                });
            }
            present[value as usize] = true;
        }

        // 1ピクセルの複製パディング。ゼロ詰めだと画像枠そのものが
        // 境界として検出されてしまう（単一クラスの画像に額縁状の
        // エッジが出る）ため、端の値を延長する。
        let pw = width + 2;
        let ph = height + 2;

        let mut plane = vec![false; pw * ph];
        let mut inverse = vec![false; pw * ph];
        let mut acc = vec![0.0f64; width * height];
        let radius = self.radius as f64;

        // 出現しないクラスの平面は閾値処理後すべて0になるので飛ばす
        for class_id in (0..self.n_classes).filter(|&c| present[c]) {
            let class_id = class_id as u16;
            for py in 0..ph {
                let sy = py.saturating_sub(1).min(height - 1) as u32;
                for px in 0..pw {
                    let sx = px.saturating_sub(1).min(width - 1) as u32;
                    let inside = label.get(sx, sy) == class_id;
                    plane[py * pw + px] = inside;
                    inverse[py * pw + px] = !inside;
                }
            }

            // クラス内側のピクセルには最寄りの外側までの距離が、
            // 外側のピクセルには最寄りの内側までの距離が入る。
            // 和を取ると全ピクセルで「最寄りの遷移までの距離」になる。
            let to_outside = squared_edt(&plane, pw, ph);
            let to_inside = squared_edt(&inverse, pw, ph);

            for y in 0..height {
                for x in 0..width {
                    let p = (y + 1) * pw + (x + 1);
                    let dist = to_outside[p].sqrt() + to_inside[p].sqrt();
                    if dist <= radius {
                        acc[y * width + x] += dist;
                    }
                }
            }
        }

        let mask: Vec<u8> = acc.iter().map(|&v| u8::from(v > 0.0)).collect();
        Ok(EdgeMask::from_raw(label.width(), label.height(), mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_from(width: u32, height: u32, data: Vec<u16>) -> LabelMap {
        LabelMap::from_raw(width, height, data).unwrap()
    }

    /// 左半分 class_a、右半分 class_b の縦分割ラベル
    fn half_plane(width: u32, height: u32, class_a: u16, class_b: u16) -> LabelMap {
        let data: Vec<u16> = (0..width * height)
            .map(|i| if i % width < width / 2 { class_a } else { class_b })
            .collect();
        label_from(width, height, data)
    }

    #[test]
    fn test_constructor_validation() {
        assert!(matches!(
            BoundaryExtractor::new(0, 2),
            Err(PrepError::Configuration { .. })
        ));
        assert!(matches!(
            BoundaryExtractor::new(3, 0),
            Err(PrepError::Configuration { .. })
        ));
        assert!(BoundaryExtractor::new(151, 2).is_ok());
        assert_eq!(
            BoundaryExtractor::with_default_radius(3).unwrap().radius(),
            DEFAULT_RADIUS
        );
    }

    #[test]
    fn test_uniform_label_has_no_edges() {
        let extractor = BoundaryExtractor::new(5, 2).unwrap();
        let label = label_from(8, 6, vec![3; 48]);

        let mask = extractor.compute(&label).unwrap();
        assert_eq!(mask.width(), 8);
        assert_eq!(mask.height(), 6);
        assert!(mask.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_output_is_binary_and_same_shape() {
        let extractor = BoundaryExtractor::new(4, 2).unwrap();
        let data: Vec<u16> = (0..12 * 9).map(|i| (i % 4) as u16).collect();
        let label = label_from(12, 9, data);

        let mask = extractor.compute(&label).unwrap();
        assert_eq!(mask.width(), label.width());
        assert_eq!(mask.height(), label.height());
        assert!(mask.pixels().iter().all(|&v| v <= 1));
    }

    #[test]
    fn test_vertical_boundary_band() {
        let extractor = BoundaryExtractor::new(2, 2).unwrap();
        let label = half_plane(12, 6, 0, 1);

        let mask = extractor.compute(&label).unwrap();
        // 境界は列5と列6の間。半径2なら列4..=7のみが1になる。
        for y in 0..6 {
            for x in 0..12 {
                let expected = (4..=7).contains(&x);
                assert_eq!(
                    mask.get(x, y) == 1,
                    expected,
                    "位置 ({x}, {y}) の期待値が不一致"
                );
            }
        }
    }

    #[test]
    fn test_permutation_invariance() {
        // どの2クラスを使っても同じ境界マスクになる
        let extractor = BoundaryExtractor::new(10, 2).unwrap();
        let mask_a = extractor.compute(&half_plane(12, 6, 0, 1)).unwrap();
        let mask_b = extractor.compute(&half_plane(12, 6, 7, 3)).unwrap();
        assert_eq!(mask_a.pixels(), mask_b.pixels());
    }

    #[test]
    fn test_wider_radius_widens_band() {
        let label = half_plane(16, 4, 0, 1);

        let narrow = BoundaryExtractor::new(2, 1).unwrap().compute(&label).unwrap();
        let wide = BoundaryExtractor::new(2, 3).unwrap().compute(&label).unwrap();

        let count = |m: &EdgeMask| m.pixels().iter().filter(|&&v| v == 1).count();
        assert!(count(&narrow) < count(&wide));
        // 半径1では境界に隣接する2列のみ
        assert_eq!(count(&narrow), 2 * 4);
    }

    #[test]
    fn test_three_class_corner_all_within_radius() {
        // 4x4・3クラス・半径2: 全ピクセルが何らかの遷移から2以内
        let extractor = BoundaryExtractor::new(3, 2).unwrap();
        let label = label_from(
            4,
            4,
            vec![0, 0, 1, 1, 0, 0, 1, 1, 2, 2, 1, 1, 2, 2, 1, 1],
        );

        let mask = extractor.compute(&label).unwrap();
        assert!(mask.pixels().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_deterministic() {
        let extractor = BoundaryExtractor::new(6, 2).unwrap();
        let data: Vec<u16> = (0..20 * 15).map(|i| ((i * 7) % 6) as u16).collect();
        let label = label_from(20, 15, data);

        let first = extractor.compute(&label).unwrap();
        let second = extractor.compute(&label).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        let extractor = BoundaryExtractor::new(3, 2).unwrap();
        let label = label_from(2, 2, vec![0, 1, 3, 2]);

        let result = extractor.compute(&label);
        match result {
            Err(PrepError::InvalidLabel {
                value,
                x,
                y,
                n_classes,
            }) => {
                assert_eq!(value, 3);
                assert_eq!((x, y), (0, 1));
                assert_eq!(n_classes, 3);
            }
            other => panic!("InvalidLabel が期待されるが {other:?} を受け取った"),
        }
    }
}
