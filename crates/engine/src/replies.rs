//! Customer-visible copy. Kept in one place so stages and tests share the
//! exact wording the shop operates with.

pub const OUTSIDE_HOURS: &str = "🕘 Nuestro horario es de 9:00 a.m. a 6:00 p.m.\n\
     Tu pedido quedará programado para las 6:00 a.m. 📅";

pub const MAIN_MENU: &str = "👋 Bienvenido a *Tienda de Regalos*\n\
     1️⃣ Favoritos\n\
     2️⃣ Entregas hoy\n\
     3️⃣ Mayoristas\n\n\
     Todos nuestros productos incluyen 🎀 moño, 🎈 globo y 💌 tarjeta personalizada.";

pub const FAVORITES: &str = "⭐ Favoritos:\n\
     • Oso gigante 1m\n\
     • Stitch 40cm\n\
     • Hello Kitty\n\
     • Capibara\n\
     • Flores eternas\n\n\
     🎀 Incluyen moño + globo + tarjeta.\n\
     ¿Qué globo prefieres? 🎈 (Feliz Día / Te Amo / Feliz Cumpleaños)\n\
     Si deseas, escribe tu mensaje de tarjeta (máx. 500).";

pub const DELIVERY_PROMPT: &str = "Para confirmar, regálame por favor:\n\
     • Nombre\n\
     • Fecha y hora de la entrega\n\
     • Ubicación y dirección";

pub const CLOSING_PROMPT: &str = "Perfecto 🙌 Para confirmar necesito:\n\
     • Nombre\n\
     • Fecha y hora de la entrega\n\
     • Ubicación y dirección";

pub const ALERT_SENT: &str = "✅ Aviso enviado. ¿Te ayudo con algo más?";

pub const DEFAULT_FORM_THANKS: &str = "¡Listo! Gracias.";

pub const FALLBACK_HELP: &str = "🤖 Soy tu asistente de Tienda de Regalos. \
     Elige 1,2,3 del menú, dime un producto (nombre o código) o escribe una \
     palabra clave (promo, entregas hoy, reclamo, etc).";

pub fn card_confirmation(card_text: &str) -> String {
    format!("Perfecto, tu tarjeta personalizada será:\n“{card_text}” 💌✅")
}

pub fn out_of_stock(item_name: &str) -> String {
    format!(
        "⚠️ {item_name} está sin stock en este momento.\n\
         Un asesor de bodega te contactará para revisar alternativas."
    )
}

pub fn available(item_name: &str) -> String {
    format!("✅ {item_name} está disponible.")
}

pub fn price_quote(price: u64) -> String {
    format!("Precio de referencia: ${}", thousands(price))
}

pub fn form_intro(fields: &[String]) -> String {
    format!("Por favor responde:\n• {}", fields.join("\n• "))
}

pub fn form_first_prompt(field: &str) -> String {
    format!("👉 Empecemos con: *{field}*")
}

pub fn form_next_prompt(field: &str) -> String {
    format!("Gracias. Ahora: *{field}*")
}

// es-CO grouping: dot every three digits.
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
