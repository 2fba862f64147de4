//! Built-in Shaanxi sample catalogue (24 records).

use crate::model::record::{Category, Coordinates, ProtectionLevel, Record};

type SampleRow = (
    &'static str,
    &'static str,
    Category,
    f64,
    f64,
    &'static str,
    ProtectionLevel,
    &'static str,
);

use Category as C;
use ProtectionLevel as L;

const SAMPLE_ROWS: [SampleRow; 24] = [
    (
        "1",
        "秦腔传统戏剧",
        C::TraditionalOpera,
        34.34,
        108.94,
        "西安",
        L::Provincial,
        "以高亢激越著称的关中地方戏，被誉为中国戏曲的活化石。",
    ),
    (
        "2",
        "华阴老腔",
        C::TraditionalMusic,
        34.57,
        110.09,
        "渭南",
        L::National,
        "黄河流域古老的民间音乐形态，声如裂帛，气势恢宏。",
    ),
    (
        "3",
        "社火舞蹈",
        C::TraditionalDance,
        34.33,
        108.70,
        "咸阳",
        L::Municipal,
        "春节期间的民俗舞蹈表演，热闹非凡，寓意吉祥。",
    ),
    (
        "4",
        "碗碗腔",
        C::Quyi,
        34.36,
        107.24,
        "宝鸡",
        L::Provincial,
        "起源于关中地区的地方曲艺，唱腔优美动听。",
    ),
    (
        "5",
        "安塞腰鼓",
        C::TraditionalSports,
        36.87,
        109.33,
        "延安",
        L::National,
        "以雄浑豪迈著称的鼓舞，展现了黄土高原人民的豪放性格。",
    ),
    (
        "6",
        "泥塑技艺（凤翔）",
        C::TraditionalArt,
        34.52,
        107.39,
        "宝鸡",
        L::Provincial,
        "色彩鲜艳、造型夸张的民间泥塑，具有浓郁的关中风情。",
    ),
    (
        "7",
        "皮影戏制作与表演",
        C::TraditionalCraft,
        34.49,
        109.50,
        "渭南",
        L::National,
        "影人雕刻与操演技艺，被称为'世界电影的鼻祖'。",
    ),
    (
        "8",
        "华山药膳",
        C::TraditionalMedicine,
        34.48,
        110.07,
        "渭南",
        L::Provincial,
        "以养生为主的药膳文化，融合了道家养生理念。",
    ),
    (
        "9",
        "岁时节令民俗（腊八）",
        C::FolkCustom,
        34.27,
        108.93,
        "西安",
        L::Municipal,
        "腊八粥、祈福等岁时活动，承载着深厚的文化内涵。",
    ),
    (
        "10",
        "说书（陕北）",
        C::FolkLiterature,
        37.50,
        109.74,
        "榆林",
        L::Provincial,
        "陕北方言说唱故事艺术，生动展现了黄土地的文化魅力。",
    ),
    (
        "11",
        "户县农民画",
        C::TraditionalArt,
        34.10,
        108.60,
        "西安",
        L::National,
        "色彩浓烈、构图饱满的民间绘画，反映了农村生活的美好。",
    ),
    (
        "12",
        "剪纸（陕北）",
        C::TraditionalArt,
        37.61,
        109.77,
        "榆林",
        L::National,
        "喜庆吉祥的窗花剪纸，寄托着对美好生活的向往。",
    ),
    (
        "13",
        "擀面皮制作技艺",
        C::TraditionalCraft,
        34.36,
        107.15,
        "宝鸡",
        L::Municipal,
        "关中小吃的传统制作法，工艺精湛，口感独特。",
    ),
    (
        "14",
        "木版年画（凤翔）",
        C::TraditionalArt,
        34.57,
        107.39,
        "宝鸡",
        L::Provincial,
        "年节张贴的民间木版画，色彩艳丽，寓意吉祥。",
    ),
    (
        "15",
        "道情皮影（韩城）",
        C::TraditionalOpera,
        35.48,
        110.44,
        "渭南",
        L::Provincial,
        "道情曲调与皮影表演结合，具有独特的艺术魅力。",
    ),
    (
        "16",
        "茶艺与斗茶民俗",
        C::FolkCustom,
        33.07,
        107.03,
        "汉中",
        L::Municipal,
        "茶事活动及习俗，体现了陕南地区的茶文化传统。",
    ),
    (
        "17",
        "秦砖汉瓦拓印技艺",
        C::TraditionalCraft,
        34.27,
        109.01,
        "西安",
        L::Provincial,
        "以文物纹样为题材的拓印技艺，传承着古代文明的印记。",
    ),
    (
        "18",
        "面花（米脂）",
        C::FolkCustom,
        37.76,
        110.18,
        "榆林",
        L::Provincial,
        "面塑装饰传统，造型精美，寓意深刻。",
    ),
    (
        "19",
        "舞龙舞狮（关中）",
        C::TraditionalDance,
        34.30,
        108.94,
        "西安",
        L::Municipal,
        "节庆时的民间舞蹈，气势磅礴，场面壮观。",
    ),
    (
        "20",
        "傩舞（商洛）",
        C::TraditionalDance,
        33.87,
        109.93,
        "商洛",
        L::Provincial,
        "民间祭祀起源的舞蹈，古朴神秘，历史悠久。",
    ),
    (
        "21",
        "端午龙舟（汉江）",
        C::TraditionalSports,
        32.69,
        109.02,
        "安康",
        L::Municipal,
        "端午竞渡习俗，体现了团结协作的体育精神。",
    ),
    (
        "22",
        "药王孙思邈传说",
        C::FolkLiterature,
        34.70,
        109.10,
        "铜川",
        L::Provincial,
        "药王文化相关传说，弘扬了悬壶济世的医者精神。",
    ),
    (
        "23",
        "中医药炮制（商州）",
        C::TraditionalMedicine,
        33.87,
        109.93,
        "商洛",
        L::Provincial,
        "本草炮制经验技法，承载着深厚的中医药文化。",
    ),
    (
        "24",
        "耀州瓷烧制技艺",
        C::TraditionalCraft,
        34.91,
        108.98,
        "铜川",
        L::National,
        "北方青瓷代表之一，工艺精湛，釉色青翠。",
    ),
];

/// Returns the sample records in catalogue order.
pub fn sample_records() -> Vec<Record> {
    SAMPLE_ROWS
        .iter()
        .map(|&(id, name, category, lat, lng, city, level, summary)| {
            Record::new(
                id,
                name,
                category,
                city,
                level,
                Some(Coordinates::new(lng, lat)),
            )
            .with_summary(summary)
        })
        .collect()
}
