/// A named font family list offered to authors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontPreset {
    /// Display name.
    pub name: &'static str,
    /// CSS-style family list passed as `fontFamily`.
    pub family: &'static str,
}

/// Built-in font family choices. Each list ends in a generic family so it always resolves.
pub const FONT_PRESETS: &[FontPreset] = &[
    FontPreset {
        name: "Noto Sans SC",
        family: "'Noto Sans SC', sans-serif",
    },
    FontPreset {
        name: "Noto Serif SC",
        family: "'Noto Serif SC', serif",
    },
    FontPreset {
        name: "Ma Shan Zheng",
        family: "'Ma Shan Zheng', cursive",
    },
    FontPreset {
        name: "Roboto Mono",
        family: "'Roboto Mono', monospace",
    },
    FontPreset {
        name: "FZLanTingHei DB",
        family: "'FZLanTingHei-DB-GBK', '方正兰亭中粗黑', 'Microsoft YaHei', sans-serif",
    },
    FontPreset {
        name: "Microsoft YaHei",
        family: "'Microsoft YaHei', '微软雅黑', sans-serif",
    },
    FontPreset {
        name: "SimHei",
        family: "SimHei, '黑体', sans-serif",
    },
    FontPreset {
        name: "SimSun",
        family: "SimSun, '宋体', serif",
    },
    FontPreset {
        name: "KaiTi",
        family: "KaiTi, '楷体', serif",
    },
    FontPreset {
        name: "PingFang SC",
        family: "'PingFang SC', sans-serif",
    },
];
