//! Weather condition names → icon asset identifiers.

/// Icon identifier for a provider condition name, e.g. "多云" → "DuoYun".
pub fn icon_for(condition: &str) -> Option<&'static str> {
    let id = match condition {
        "暴雪" => "BaoXue",
        "暴雨" => "BaoYu",
        "暴雨到暴雪" => "BaoYuDaoDaBaoYu",
        "大暴雨" => "DaBaoYu",
        "大暴雨到大暴雪" => "DaBaoYuDaoTeDaBaoYu",
        "大到暴雪" => "DaDaoBaoXue",
        "大到暴雨" => "DaDaoBaoYu",
        "大雪" => "DaXue",
        "大雨" => "DaYu",
        "冻雨" => "DongYu",
        "多云" => "DuoYun",
        "浮尘" => "FuChen",
        "雷阵雨" => "LeiZhenYu",
        "雷阵雨伴有冰雹" => "LeiZhenYuBanYouBingBao",
        "霾" => "Mai",
        "强沙尘暴" => "QiangShaChenBao",
        "晴" => "Qing",
        "沙尘暴" => "ShaChenBao",
        "特大暴雨" => "TeDaBaoYu",
        "雾" => "Wu",
        "小到中雨" => "XiaoDaoZhongYu",
        "小到中雪" => "XiaoDaoZhongXue",
        "小雪" => "XiaoXue",
        "小雨" => "XiaoYu",
        "雪" => "Xue",
        "扬沙" => "YangSha",
        "阴" => "Yin",
        "雨" => "Yu",
        "雨夹雪" => "YuJiaXue",
        "阵雨" => "ZhenYu",
        "阵雪" => "ZhenXue",
        "中雨" => "ZhongYu",
        "中雪" => "ZhongXue",
        _ => return None,
    };
    Some(id)
}

/// Relative asset path of the condition icon.
pub fn icon_path(condition: &str) -> Option<String> {
    icon_for(condition).map(|id| format!("res/type/{id}.png"))
}
