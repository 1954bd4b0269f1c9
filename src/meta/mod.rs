// 補助メタデータ（クラス統計・カラーパレット）の正規化

pub mod class_info;
pub mod palette;

pub use class_info::{ClassInfo, ClassTable};
pub use palette::{LegendEntry, Palette};
