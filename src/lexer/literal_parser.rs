//! リテラルの解析

/// 文字列の字句から前後の引用符を取り除く
///
/// エスケープシーケンスは処理せず、書かれたままの内容を返す。
pub fn string_contents(lexeme: &str) -> &str {
    let inner = lexeme.strip_prefix('"').unwrap_or(lexeme);
    inner.strip_suffix('"').unwrap_or(inner)
}

/// `digits` または `digits.digits` 形式の数値を解析
pub fn parse_number(lexeme: &str) -> f64 {
    // スキャナは数字列しか渡さないので解析は必ず成功する
    lexeme.parse::<f64>().unwrap_or_default()
}

/// 数値を表示用の文字列に変換
///
/// 1e-3以上1e7未満は `123.0` のような小数表記、それ以外は `1.0E7` のような指数表記。
pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        // Debugは整数値でも小数点を残す: 123.0
        return format!("{:?}", value);
    }

    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{}E{}", mantissa, exponent)
        }
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => scientific,
    }
}
