//! Prompt templates for assisted extraction.

/// System instruction: strict schema-shaped JSON, empty strings for
/// anything unknown.
pub const SYSTEM_PROMPT: &str = "You extract concise structured job data from free text.\n\
Return a strict JSON object with keys: \
title, pay_rate, pay_type, location, shift_times, contact_phone, business_name, \
business_type, min_qualification, description, language_requirement. \
Use empty strings for missing fields. Strip lead-in phrases like 'I have a', \
'We have an', 'Hiring a' from title/business. Respond with JSON only.";

/// Worked examples sent ahead of the actual message.
pub const WORKED_EXAMPLES: &str = r#"Input:
I have a Front desk student assistant position at California State University, Sacramento with offering pay rate of $18 per hour and the payment will be biweekly deposited into their registered account. Should be able to work from 9AM - 5PM from Monday to Friday. You can reach out or send your resumes to rajakolagotla@gmail.com. Candidates should be able to communicate in English and Spanish and should be able to well receive the customers coming to the office. Type of business is education and business name is Social welfare office at California State University-Sacramento.
Output:
{"title":"Front desk student assistant","pay_rate":"$18/hour","pay_type":"hourly","location":"California State University, Sacramento","shift_times":"9AM - 5PM Monday to Friday","contact_phone":"rajakolagotla@gmail.com","business_name":"Social welfare office at California State University-Sacramento","business_type":"education","min_qualification":"","description":"Candidates should be able to communicate in English and Spanish and should be able to well receive the customers coming to the office.","language_requirement":"English, Spanish"}

Input:
Hiring a barista. $20/hr. Location: 123 Market St, SF. Shifts: Sat-Sun 7am-1pm. Contact: +15551234567. Business: Moonlight Cafe, type restaurant. Need latte art.
Output:
{"title":"barista","pay_rate":"$20/hr","pay_type":"hourly","location":"123 Market St, SF","shift_times":"Sat-Sun 7am-1pm","contact_phone":"+15551234567","business_name":"Moonlight Cafe","business_type":"restaurant","min_qualification":"","description":"Need latte art.","language_requirement":""}"#;

/// User prompt wrapping the worked examples around the message.
pub fn user_prompt(text: &str) -> String {
    format!("{WORKED_EXAMPLES}\nMessage:\n{text}")
}
